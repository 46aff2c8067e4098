use glam::IVec2;

use crate::{
    widget::{Input, View, Widget, WidgetKind},
    Bitmap, Event,
};

/// Handle returned by [`Panel::add`]. Only valid for the panel that issued it,
/// until its widgets are replaced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WidgetId(usize);

pub struct Panel {
    widgets: Vec<Widget>,
    // Sub-pixel wheel movement accumulates here; widgets see it rounded.
    offset: f64,
    min_scroll: i32,
}

impl Panel {
    pub const WHEEL_STEP: f64 = 10.0;

    pub fn new(min_scroll: i32) -> Self {
        Panel {
            widgets: Vec::new(),
            offset: 0.0,
            min_scroll: min_scroll.min(0),
        }
    }
    pub fn with_widgets<I>(widgets: I, min_scroll: i32) -> Self
    where
        I: IntoIterator<Item = Widget>,
    {
        let mut panel = Panel::new(min_scroll);
        panel.set_widgets(widgets);
        panel
    }

    pub fn add<W: Into<Widget>>(&mut self, widget: W) -> WidgetId {
        let mut widget = widget.into();
        widget.set_scroll(self.scroll());
        self.widgets.push(widget);
        WidgetId(self.widgets.len() - 1)
    }
    pub fn get<W: WidgetKind>(&self, id: WidgetId) -> Option<&W> {
        self.widgets.get(id.0).and_then(Widget::downcast_ref)
    }
    pub fn get_mut<W: WidgetKind>(&mut self, id: WidgetId) -> Option<&mut W> {
        self.widgets.get_mut(id.0).and_then(Widget::downcast_mut)
    }
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }
    /// Replaces every widget. Previously issued ids become meaningless.
    pub fn set_widgets<I>(&mut self, widgets: I)
    where
        I: IntoIterator<Item = Widget>,
    {
        self.widgets = widgets.into_iter().collect();
        let scroll = self.scroll();
        for widget in self.widgets.iter_mut() {
            widget.set_scroll(scroll);
        }
    }

    pub fn scroll(&self) -> i32 {
        self.offset.round() as i32
    }
    pub fn min_scroll(&self) -> i32 {
        self.min_scroll
    }
    pub fn set_scroll(&mut self, scroll: i32) {
        self.scroll_to(f64::from(scroll));
    }

    fn scroll_to(&mut self, offset: f64) {
        if offset.is_nan() {
            return;
        }
        let previous = self.scroll();
        self.offset = offset.clamp(f64::from(self.min_scroll), 0.0);
        let scroll = self.scroll();
        if scroll != previous {
            log::trace!("panel scroll {} -> {}", previous, scroll);
        }
        for widget in self.widgets.iter_mut() {
            widget.set_scroll(scroll);
        }
    }

    pub fn focused(&self) -> bool {
        self.inputs().any(Input::focused)
    }
    /// Gives keyboard focus to the input `id`, taking it from all others.
    /// Passing an id that is not an input just clears focus.
    pub fn focus(&mut self, id: WidgetId) {
        for (index, widget) in self.widgets.iter_mut().enumerate() {
            if let Widget::Input(input) = widget {
                input.set_focused(index == id.0);
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        for widget in self.widgets.iter_mut() {
            widget.handle_event(event);
        }
        match event {
            Event::PointerDown { .. } => self.keep_topmost_focus(),
            Event::Wheel { precise_y } => {
                self.scroll_to(self.offset + f64::from(*precise_y) * Self::WHEEL_STEP);
            }
            _ => {}
        }
    }
    pub fn update(&mut self, position: IVec2, pressed: &[bool]) {
        for widget in self.widgets.iter_mut() {
            widget.update(position, pressed);
        }
    }
    pub fn render(&self, target: &mut Bitmap) {
        for widget in self.widgets.iter() {
            target.blit(&widget.render(), widget.position());
        }
    }

    fn inputs(&self) -> impl Iterator<Item = &Input> {
        self.widgets.iter().filter_map(Widget::downcast_ref::<Input>)
    }

    // Overlapping inputs can all take focus from one click; the one drawn on
    // top wins.
    fn keep_topmost_focus(&mut self) {
        let mut found = false;
        for widget in self.widgets.iter_mut().rev() {
            if let Widget::Input(input) = widget {
                if input.focused() {
                    if found {
                        input.set_focused(false);
                    }
                    found = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pane::Shared;

    use super::*;
    use crate::{colors, widget::tests::block_font, Button, Label, Surface, Toggle};

    fn panel_with_labels(min_scroll: i32) -> (Panel, Vec<WidgetId>) {
        let mut panel = Panel::new(min_scroll);
        let ids = (0..3)
            .map(|row| panel.add(Label::new(IVec2::new(0, row * 20), "row", block_font())))
            .collect();
        (panel, ids)
    }

    #[test]
    fn wheel_scrolls_by_ten_per_unit() {
        let (mut panel, _) = panel_with_labels(-100);
        panel.handle_event(&Event::Wheel { precise_y: -3.0 });
        assert_eq!(panel.scroll(), -30);
    }

    #[test]
    fn scroll_is_clamped() {
        let (mut panel, ids) = panel_with_labels(-100);
        panel.set_scroll(-250);
        assert_eq!(panel.scroll(), -100);
        panel.handle_event(&Event::Wheel { precise_y: 4.0 });
        assert_eq!(panel.scroll(), -60);
        panel.handle_event(&Event::Wheel { precise_y: 40.0 });
        assert_eq!(panel.scroll(), 0);
        panel.set_scroll(i32::MIN);
        panel.handle_event(&Event::Wheel { precise_y: -1e9 });
        assert_eq!(panel.scroll(), -100);

        for id in ids {
            let label = panel.get::<Label>(id).unwrap();
            assert_eq!(label.scroll(), -100);
            assert_eq!(label.rect().y(), label.base().anchor().y - 100);
        }
    }

    #[test]
    fn fractional_wheel_movement_accumulates() {
        let (mut panel, ids) = panel_with_labels(-100);
        for _ in 0..10 {
            panel.handle_event(&Event::Wheel { precise_y: -0.04 });
        }
        assert_eq!(panel.scroll(), -4);

        for _ in 0..10 {
            panel.handle_event(&Event::Wheel { precise_y: -0.05 });
        }
        assert_eq!(panel.scroll(), -9);
        let label = panel.get::<Label>(ids[0]).unwrap();
        assert_eq!(label.scroll(), -9);

        panel.set_scroll(-100);
        panel.handle_event(&Event::Wheel { precise_y: -3.0 });
        panel.handle_event(&Event::Wheel { precise_y: 0.26 });
        assert_eq!(panel.scroll(), -97);
    }

    #[test]
    fn nan_wheel_is_ignored() {
        let (mut panel, _) = panel_with_labels(-100);
        panel.set_scroll(-20);
        panel.handle_event(&Event::Wheel { precise_y: f32::NAN });
        assert_eq!(panel.scroll(), -20);
        panel.handle_event(&Event::Wheel { precise_y: -1.0 });
        assert_eq!(panel.scroll(), -30);
    }

    #[test]
    fn extreme_min_scroll_saturates_positions() {
        let mut panel = Panel::new(i32::MIN);
        let id = panel.add(Label::new(IVec2::new(0, -5), "x", block_font()));
        panel.set_scroll(i32::MIN);
        assert_eq!(panel.scroll(), i32::MIN);
        let label = panel.get::<Label>(id).unwrap();
        assert_eq!(label.position(), IVec2::new(0, i32::MIN));
        assert_eq!(label.rect().y(), i32::MIN);
        assert!(!label.rect().contains(IVec2::new(0, 0)));

        panel.handle_event(&Event::pointer_down(0, i32::MIN));
        let mut target = Bitmap::new(4, 4);
        panel.render(&mut target);
        assert_eq!(target.pixel(1, 1), Some(colors::TRANSPARENT));
    }

    #[test]
    fn positive_min_scroll_is_treated_as_zero() {
        let mut panel = Panel::new(25);
        assert_eq!(panel.min_scroll(), 0);
        panel.set_scroll(10);
        assert_eq!(panel.scroll(), 0);
    }

    #[test]
    fn added_widgets_pick_up_current_scroll() {
        let (mut panel, _) = panel_with_labels(-50);
        panel.set_scroll(-20);
        let id = panel.add(Surface::new(IVec2::new(0, 100), Bitmap::new(1, 1)));
        assert_eq!(panel.get::<Surface>(id).unwrap().position(), IVec2::new(0, 80));

        panel.set_widgets([Label::new(IVec2::new(0, 5), "x", block_font()).into()]);
        assert_eq!(panel.widgets().len(), 1);
        assert_eq!(panel.widgets()[0].rect().y(), -15);
    }

    #[test]
    fn typed_access_checks_variant() {
        let (mut panel, ids) = panel_with_labels(0);
        assert!(panel.get::<Button>(ids[0]).is_none());
        panel.get_mut::<Label>(ids[1]).unwrap().set_text("changed");
        assert_eq!(panel.get::<Label>(ids[1]).unwrap().text(), "changed");
        assert!(panel.get::<Label>(WidgetId(42)).is_none());
    }

    #[test]
    fn events_reach_every_widget() {
        let mut panel = Panel::new(-100);
        let count = Shared::new(0);
        for x in [0, 100] {
            let mut button = Button::new(IVec2::new(x, 0), "go", block_font());
            let counter = count.clone();
            button.add_pressed_listener(move |_| *counter.get_mut() += 1);
            panel.add(button);
        }
        let toggle = panel.add(Toggle::new(IVec2::new(0, 0), block_font()));

        panel.handle_event(&Event::pointer_down(4, 4));
        assert_eq!(count.value(), 1);
        assert!(panel.get::<Toggle>(toggle).unwrap().state());

        panel.handle_event(&Event::pointer_down(104, 4));
        assert_eq!(count.value(), 2);
    }

    #[test]
    fn update_reaches_every_widget() {
        let mut panel = Panel::new(0);
        let a = panel.add(Button::new(IVec2::new(0, 0), "a", block_font()));
        let b = panel.add(Button::new(IVec2::new(0, 0), "b", block_font()));
        panel.update(IVec2::new(2, 2), &[true]);
        for id in [a, b] {
            assert_eq!(
                panel.get::<Button>(id).unwrap().pointer_state(),
                crate::PointerState::Press
            );
        }
    }

    #[test]
    fn focus_follows_clicks() {
        let mut panel = Panel::new(0);
        let first = panel.add(Input::new(IVec2::new(0, 0), 50, 8, block_font()));
        let second = panel.add(Input::new(IVec2::new(0, 40), 50, 8, block_font()));
        assert!(!panel.focused());

        panel.handle_event(&Event::pointer_down(1, 1));
        assert!(panel.focused());
        panel.handle_event(&Event::text("a"));
        panel.handle_event(&Event::pointer_down(1, 41));
        panel.handle_event(&Event::text("b"));

        assert!(!panel.get::<Input>(first).unwrap().focused());
        assert!(panel.get::<Input>(second).unwrap().focused());
        assert_eq!(panel.get::<Input>(first).unwrap().text(), "a");
        assert_eq!(panel.get::<Input>(second).unwrap().text(), "b");

        panel.handle_event(&Event::pointer_down(200, 200));
        assert!(!panel.focused());
    }

    #[test]
    fn overlapping_inputs_focus_only_the_top_one() {
        let mut panel = Panel::new(0);
        let bottom = panel.add(Input::new(IVec2::new(0, 0), 50, 8, block_font()));
        let top = panel.add(Input::new(IVec2::new(10, 0), 50, 8, block_font()));
        panel.handle_event(&Event::pointer_down(20, 5));
        assert!(!panel.get::<Input>(bottom).unwrap().focused());
        assert!(panel.get::<Input>(top).unwrap().focused());

        panel.focus(bottom);
        assert!(panel.get::<Input>(bottom).unwrap().focused());
        assert!(!panel.get::<Input>(top).unwrap().focused());
    }

    #[test]
    fn render_composites_in_insertion_order_at_scrolled_positions() {
        let mut panel = Panel::new(-10);
        panel.add(Surface::new(IVec2::new(0, 10), Bitmap::filled(4, 4, colors::RED)));
        panel.add(Surface::new(IVec2::new(2, 10), Bitmap::filled(4, 4, colors::BLUE)));
        panel.set_scroll(-10);

        let mut target = Bitmap::filled(8, 8, colors::BLACK);
        panel.render(&mut target);
        assert_eq!(target.pixel(0, 0), Some(colors::RED));
        assert_eq!(target.pixel(2, 0), Some(colors::BLUE));
        assert_eq!(target.pixel(5, 3), Some(colors::BLUE));
        assert_eq!(target.pixel(0, 4), Some(colors::BLACK));
    }
}
