use std::{
    cell::{Cell, Ref, RefCell, RefMut},
    rc::Rc,
};

type Location = &'static std::panic::Location<'static>;

struct Value<T: ?Sized> {
    last_borrowed: Cell<Option<Location>>,
    inner: RefCell<T>,
}

impl<T> Value<T> {
    const fn new(t: T) -> Self {
        Value {
            last_borrowed: Cell::new(None),
            inner: RefCell::new(t),
        }
    }
}

pub struct Shared<T: ?Sized>(Rc<Value<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared(Rc::new(Value::new(value)))
    }
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.get_mut(), value)
    }
}

impl<T: Copy> Shared<T> {
    #[track_caller]
    pub fn value(&self) -> T {
        *self.get()
    }
}

impl<T: ?Sized> Shared<T> {
    #[track_caller]
    pub fn get(&self) -> Ref<'_, T> {
        match self.0.inner.try_borrow() {
            Ok(guard) => {
                self.0
                    .last_borrowed
                    .set(Some(std::panic::Location::caller()));
                guard
            }
            Err(_) => self.borrow_conflict(),
        }
    }
    #[track_caller]
    pub fn get_mut(&self) -> RefMut<'_, T> {
        match self.0.inner.try_borrow_mut() {
            Ok(guard) => {
                self.0
                    .last_borrowed
                    .set(Some(std::panic::Location::caller()));
                guard
            }
            Err(_) => self.borrow_conflict(),
        }
    }

    #[track_caller]
    fn borrow_conflict(&self) -> ! {
        match self.0.last_borrowed.get() {
            Some(previous) => panic!(
                "Shared<{}> already borrowed at {}",
                std::any::type_name::<T>(),
                previous
            ),
            None => panic!("Shared<{}> unknown borrow error", std::any::type_name::<T>()),
        }
    }
}

impl<T: ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
impl<T: ?Sized> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl<T: ?Sized> Eq for Shared<T> {}

pub struct Signal<T> {
    listeners: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Signal {
            listeners: Vec::new(),
        }
    }
    pub fn add_listener<F>(&mut self, f: F)
    where
        F: FnMut(&T) + 'static,
    {
        self.listeners.push(Box::new(f));
    }
    pub fn emit(&mut self, param: &T) {
        for listener in self.listeners.iter_mut() {
            listener(param);
        }
    }
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Signal::new()
    }
}

#[macro_export]
macro_rules! impl_add_signal_listener {
    ($type:ty, $member:ident, $param:ty, $fn_name:ident) => {
        impl $type {
            pub fn $fn_name<F>(&mut self, f: F)
            where
                F: FnMut(&$param) + 'static,
            {
                self.$member.add_listener(f);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_calls_listeners_in_order() {
        let log = Shared::new(Vec::new());
        let mut signal = Signal::new();
        let first = log.clone();
        signal.add_listener(move |value: &i32| first.get_mut().push(("first", *value)));
        let second = log.clone();
        signal.add_listener(move |value: &i32| second.get_mut().push(("second", *value)));

        signal.emit(&7);
        signal.emit(&8);

        assert_eq!(signal.len(), 2);
        assert_eq!(
            *log.get(),
            vec![("first", 7), ("second", 7), ("first", 8), ("second", 8)]
        );
    }

    #[test]
    fn shared_handles_compare_by_identity() {
        let a = Shared::new(1);
        let b = a.clone();
        let c = Shared::new(1);
        assert!(a == b);
        assert!(a != c);
        assert_eq!(b.replace(5), 1);
        assert_eq!(a.value(), 5);
    }

    #[test]
    #[should_panic(expected = "already borrowed at")]
    fn conflicting_borrow_reports_previous_site() {
        let shared = Shared::new(0);
        let _reader = shared.get();
        let _writer = shared.get_mut();
    }
}
