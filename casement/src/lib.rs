pub mod asset;
pub mod input;
pub mod screen;

pub use glam as math;
pub use pane::*;
pub use palette as color;

use miniquad::*;
use serde::{Deserialize, Serialize};
use std::{
    fs::OpenOptions,
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};
use tiny_game_loop::GameLoop;

use glyph_brush::ab_glyph::FontArc;
use input::Pointer;
use sash::{Event, FontRef, GlyphFont};
use screen::Screen;

pub mod window {
    pub use miniquad::window::{order_quit, request_quit, screen_size};
}

pub type RenderingContext = Box<dyn RenderingBackend>;

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct WindowConfig {
    width: u32,
    height: u32,
    fullscreen: bool,
    fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fullscreen: false,
            fps: 60,
        }
    }
}

impl WindowConfig {
    const FILENAME: &'static str = "window.yaml";
    fn create_default_config_if_missing() -> asset::Result<()> {
        let path = asset::get_path("config", Self::FILENAME);
        if path.exists() {
            return Ok(());
        }
        log::info!("Creating default file {}", path.display());
        asset::save_yaml_file("config", Self::FILENAME, &WindowConfig::default())
    }
    fn load_config() -> asset::Result<Self> {
        asset::load_yaml_file_or_default("config", Self::FILENAME)
    }
}

pub trait Game: Sized + 'static {
    fn set_screen_size(&mut self, width: u32, height: u32);
    fn handle_event(&mut self, event: Event);
    fn quit_requested(&mut self) -> bool {
        true
    }
    /// Called once per fixed step with the pointer as it stands this frame.
    fn update(&mut self, frame_time: Duration, pointer: &Pointer);
    fn render(&mut self, context: &mut RenderingContext);
}

pub trait GameLoader: 'static {
    type Assets;
    type Game: Game;
    /// Font files under `fonts/` and the pixel size to rasterize each at.
    fn fonts() -> Vec<(&'static str, f32)>;
    fn create_default_files() -> asset::Result<()>;
    fn load(context: &mut RenderingContext) -> asset::Result<Self::Assets>;
    fn create_game(screen: Screen, fonts: Vec<FontRef>, assets: Self::Assets) -> Self::Game;
}

struct Stage<G: Game> {
    context: RenderingContext,
    game_loop: GameLoop,
    time: Instant,
    pointer: Pointer,
    game: G,
}

impl<G: Game> Stage<G> {
    fn new(game: G, context: RenderingContext, window_config: WindowConfig) -> Self {
        Stage {
            context,
            game_loop: GameLoop::new_with_fps(window_config.fps, Duration::from_millis(250)),
            time: Instant::now(),
            pointer: Pointer::default(),
            game,
        }
    }
}

impl<G: Game> EventHandler for Stage<G> {
    fn update(&mut self) {
        let elapsed = self.time.elapsed();
        self.time = Instant::now();
        let update = self.game_loop.update(elapsed);
        if update.num_updates > 0 {
            let pointer = &self.pointer;
            let game = &mut self.game;
            update.run(|update| game.update(update.frame_time, pointer));
        } else {
            // Limit framerate
            std::thread::sleep(update.frame_time.saturating_sub(elapsed));
        }
    }

    fn draw(&mut self) {
        self.game.render(&mut self.context);
        self.context.commit_frame();
    }

    fn quit_requested_event(&mut self) {
        if !self.game.quit_requested() {
            miniquad::window::cancel_quit();
        }
    }

    fn resize_event(&mut self, width: f32, height: f32) {
        self.game.set_screen_size(width as u32, height as u32);
    }

    fn mouse_motion_event(&mut self, x: f32, y: f32) {
        self.pointer.moved(math::Vec2::new(x, y));
    }
    fn mouse_wheel_event(&mut self, _x: f32, y: f32) {
        self.game.handle_event(Event::Wheel { precise_y: y });
    }
    fn mouse_button_down_event(&mut self, button: MouseButton, x: f32, y: f32) {
        self.pointer.moved(math::Vec2::new(x, y));
        if let Ok(button) = button.try_into() {
            self.pointer.button(button, true);
            self.game.handle_event(Event::PointerDown {
                position: self.pointer.position(),
            });
        }
    }
    fn mouse_button_up_event(&mut self, button: MouseButton, x: f32, y: f32) {
        self.pointer.moved(math::Vec2::new(x, y));
        if let Ok(button) = button.try_into() {
            self.pointer.button(button, false);
        }
    }

    fn key_down_event(&mut self, keycode: KeyCode, keymods: KeyMods, _repeat: bool) {
        self.game.handle_event(Event::KeyDown {
            key: input::key(keycode),
            modifiers: input::modifiers(keymods),
        });
    }
    fn char_event(&mut self, character: char, keymods: KeyMods, _repeat: bool) {
        if let Some(event) = input::text_input(character, keymods) {
            self.game.handle_event(event);
        }
    }
}

fn load_stage1<G: GameLoader>() -> asset::Result<(WindowConfig, Vec<(FontArc, f32)>)> {
    println!("{}", console::style("Loading game (stage 1)").bold());

    #[cfg(debug_assertions)]
    {
        asset::create_dir("config")?;
        WindowConfig::create_default_config_if_missing()?;
        G::create_default_files()?;
    }

    let window_config = WindowConfig::load_config()?;
    let mut fonts = Vec::new();
    for (font_file, px_size) in G::fonts() {
        fonts.push((asset::load_font_file("fonts", font_file)?, px_size));
    }
    Ok((window_config, fonts))
}

fn load_stage2<G: GameLoader>(context: &mut RenderingContext) -> asset::Result<G::Assets> {
    println!("{}", console::style("Loading game (stage 2)").bold());
    G::load(context)
}

fn create_game<G: GameLoader>(
    screen: Screen,
    fonts: Vec<(FontArc, f32)>,
    assets: G::Assets,
    screen_size: (u32, u32),
) -> G::Game {
    println!("{}", console::style("Starting game loop").bold());
    let fonts = fonts
        .into_iter()
        .map(|(font, px_size)| Rc::new(GlyphFont::new(font, px_size)) as FontRef)
        .collect();
    let mut game = G::create_game(screen, fonts, assets);
    game.set_screen_size(screen_size.0, screen_size.1);
    game
}

fn error_log_path() -> PathBuf {
    let mut path = asset::base_path();
    path.push("error.log");
    path
}

fn append_error_log(message: String) {
    use std::io::Write;
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(error_log_path())
    {
        let _ = writeln!(file, "{}\n", message);
    }
}

#[track_caller]
pub fn nonfatal_error(message: &str) {
    let location = std::panic::Location::caller();
    log::warn!("nonfatal error at {location}: {message}");
    append_error_log(format!("nonfatal at {}:\n{}", location, message));
    println!(
        "{}",
        console::style("A nonfatal error occurred. See error.log for details.").red()
    );
    let _ = msgbox::create("Error", message, msgbox::IconType::Error);
}

pub trait ResultExt<T> {
    fn unwrap_nonfatal(self) -> T;
}

impl<T: Default, E: std::error::Error> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn unwrap_nonfatal(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => {
                nonfatal_error(&error.to_string());
                Default::default()
            }
        }
    }
}

fn panic_handler(panic_info: &std::panic::PanicHookInfo) {
    append_error_log(panic_info.to_string());
    log::error!("{panic_info}");
    println!(
        "{}",
        console::style("A fatal error occurred. See error.log for details.").red()
    );
    let payload = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
        s
    } else {
        "An unknown error occured"
    };
    let message = payload
        .strip_prefix("called `Result::unwrap()` on an `Err` value: ")
        .unwrap_or(payload);
    let _ = msgbox::create("Fatal Error", message, msgbox::IconType::Error);
}

/// Opens the window and runs `G` until the window closes. Loading failures
/// are fatal and reported through the panic hook.
pub fn run_game<G: GameLoader>(window_title: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let _ = std::fs::remove_file(error_log_path());
    std::panic::set_hook(Box::new(panic_handler));

    let (window_config, fonts) = load_stage1::<G>().unwrap();
    let config = conf::Conf {
        window_title: window_title.to_string(),
        window_width: window_config.width.try_into().unwrap(),
        window_height: window_config.height.try_into().unwrap(),
        fullscreen: window_config.fullscreen,
        window_resizable: false,
        ..Default::default()
    };
    let screen_size = (window_config.width, window_config.height);
    miniquad::start(config, move || {
        let mut context = miniquad::window::new_rendering_backend();
        let assets = load_stage2::<G>(&mut context).unwrap();
        let screen = Screen::new(&mut context, screen_size.0, screen_size.1).unwrap();
        let game = create_game::<G>(screen, fonts, assets, screen_size);
        Box::new(Stage::new(game, context, window_config))
    });
}
