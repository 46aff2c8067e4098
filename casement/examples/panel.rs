use casement::{
    asset, input::Pointer, screen::Screen, window, Game, GameLoader, RenderingContext, ResultExt,
    Shared,
};
use sash::{
    colors, glam::IVec2, palette::LinSrgba, Bitmap, Button, Event, FontRef, Input, Key, Label,
    Panel, Surface, Toggle, WidgetId,
};
use std::time::Duration;

const ROWS: i32 = 24;
const ROW_HEIGHT: i32 = 24;
const FIRST_ROW: i32 = 200;

struct PanelDemo {
    screen: Screen,
    panel: Panel,
    clicks: Shared<u32>,
    dark: Shared<bool>,
    counter: WidgetId,
    name: WidgetId,
    greeting: WidgetId,
}

impl PanelDemo {
    fn new(screen: Screen, fonts: Vec<FontRef>, logo: Bitmap) -> Self {
        let main = fonts[0].clone();
        let title = fonts[1].clone();

        let content_height = FIRST_ROW + ROWS * ROW_HEIGHT + 16;
        let (_, screen_height) = screen.size();
        let mut panel = Panel::new(screen_height as i32 - content_height);

        panel.add(Label::with_style(
            IVec2::new(16, 16),
            "Panel demo",
            title,
            Some(LinSrgba::new(0.05, 0.05, 0.2, 1.0)),
            None,
        ));

        let clicks = Shared::new(0);
        let mut button = Button::new(IVec2::new(16, 56), " Click me ", main.clone());
        let clicks1 = clicks.clone();
        button.add_pressed_listener(move |_| *clicks1.get_mut() += 1);
        panel.add(button);
        let counter = panel.add(Label::new(IVec2::new(140, 56), "Clicked 0 times", main.clone()));

        let dark = Shared::new(true);
        let mut toggle = Toggle::new(IVec2::new(16, 96), main.clone());
        toggle.set_state(true);
        let dark1 = dark.clone();
        toggle.add_changed_listener(move |&state| {
            dark1.replace(state);
        });
        panel.add(toggle);
        panel.add(Label::new(IVec2::new(60, 96), "Dark background", main.clone()));

        let name = panel.add(Input::new(IVec2::new(16, 136), 200, 24, main.clone()));
        let greeting = panel.add(Label::new(IVec2::new(232, 136), "", main.clone()));
        panel.add(Surface::new(IVec2::new(400, 16), logo));

        for row in 0..ROWS {
            panel.add(Label::with_style(
                IVec2::new(16, FIRST_ROW + row * ROW_HEIGHT),
                &format!("Row {} of {}. Scroll with the mouse wheel.", row + 1, ROWS),
                main.clone(),
                None,
                Some(400),
            ));
        }

        PanelDemo {
            screen,
            panel,
            clicks,
            dark,
            counter,
            name,
            greeting,
        }
    }

    fn refresh_labels(&mut self) {
        let text = format!("Clicked {} times", self.clicks.value());
        if let Some(counter) = self.panel.get_mut::<Label>(self.counter) {
            if counter.text() != text {
                counter.set_text(&text);
            }
        }

        let name = self
            .panel
            .get::<Input>(self.name)
            .map(|input| input.text().to_owned())
            .unwrap_or_default();
        let text = if name.is_empty() {
            String::new()
        } else {
            format!("Hello, {name}!")
        };
        if let Some(greeting) = self.panel.get_mut::<Label>(self.greeting) {
            if greeting.text() != text {
                greeting.set_text(&text);
            }
        }
    }
}

impl Game for PanelDemo {
    fn set_screen_size(&mut self, width: u32, height: u32) {
        self.screen.set_size(width, height);
    }

    fn handle_event(&mut self, event: Event) {
        // Escape belongs to the text field while it has focus.
        if let Event::KeyDown {
            key: Key::Escape, ..
        } = event
        {
            if !self.panel.focused() {
                window::request_quit();
                return;
            }
        }
        self.panel.handle_event(&event);
    }

    fn update(&mut self, _frame_time: Duration, pointer: &Pointer) {
        self.panel.update(pointer.position(), pointer.pressed());
        self.refresh_labels();
    }

    fn render(&mut self, context: &mut RenderingContext) {
        let background = if self.dark.value() {
            colors::BLACK
        } else {
            LinSrgba::new(0.3, 0.3, 0.3, 1.0)
        };
        self.screen.set_background(background);
        self.panel.render(self.screen.begin_frame());
        self.screen.present(context);
    }
}

impl GameLoader for PanelDemo {
    type Assets = Bitmap;
    type Game = Self;

    fn fonts() -> Vec<(&'static str, f32)> {
        vec![("OpenSans-Regular.ttf", 16.0), ("OpenSans-Bold.ttf", 20.0)]
    }

    fn create_default_files() -> asset::Result<()> {
        Ok(())
    }

    fn load(_context: &mut RenderingContext) -> asset::Result<Self::Assets> {
        Ok(asset::load_png_file("images", "logo.png").unwrap_nonfatal())
    }

    fn create_game(screen: Screen, fonts: Vec<FontRef>, logo: Self::Assets) -> Self::Game {
        PanelDemo::new(screen, fonts, logo)
    }
}

fn main() {
    casement::run_game::<PanelDemo>("Panel Example");
}
