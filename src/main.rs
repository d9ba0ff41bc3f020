mod command;
mod config;
mod scenario;
mod utility;

use command::{Command, CommandStack, Edit};
use config::{ChannelConfig, MAX_STEPS_PER_FRAME};
use lbm::Lattice;
use log::{debug, error, info, warn};
use macroquad::prelude::*;
use rfd::FileDialog;
use std::path::PathBuf;
use utility::*;

#[derive(PartialEq, Clone, Copy)]
enum ToolMode {
    Paint,
    Erase,
}

struct Viewer {
    config: ChannelConfig,
    lattice: Lattice,
    command_stack: CommandStack,
    current_edit: Option<(ToolMode, Edit)>,
    image: Image,
    texture: Texture2D,
    paused: bool,
    steps_per_frame: usize,
}

impl Viewer {
    fn new(config: ChannelConfig, lattice: Lattice) -> Self {
        let image = Image::gen_image_color(config.width as u16, config.height as u16, BLACK);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);
        let (w, h) = config.window_size();
        request_new_screen_size(w, h);

        Self {
            steps_per_frame: config.steps_per_frame,
            config,
            lattice,
            command_stack: CommandStack::new(),
            current_edit: None,
            image,
            texture,
            paused: false,
        }
    }

    fn reset(&mut self) {
        match scenario::build(&self.config) {
            Ok(lattice) => {
                self.lattice = lattice;
                self.command_stack.clear();
                self.current_edit = None;
                info!("channel reset");
            }
            Err(e) => error!("could not rebuild channel: {}", e),
        }
    }

    fn replace_config(&mut self, config: ChannelConfig) {
        match scenario::build(&config) {
            Ok(lattice) => {
                *self = Viewer::new(config, lattice);
            }
            Err(e) => error!("keeping current channel: {}", e),
        }
    }

    fn step(&mut self) {
        if self.paused {
            return;
        }
        for _ in 0..self.steps_per_frame {
            self.lattice.advance();
        }
        if self.lattice.time_step() % 1000 < self.steps_per_frame as u64 {
            debug!(
                "step {}: mass {:.6}, max speed {:.4}",
                self.lattice.time_step(),
                self.lattice.total_mass(),
                self.lattice.max_speed()
            );
        }
    }

    fn apply(&mut self, mode: ToolMode, x: usize, y: usize) -> bool {
        match mode {
            ToolMode::Paint => scenario::paint(&mut self.lattice, x, y),
            ToolMode::Erase => scenario::erase(&mut self.lattice, &self.config, x, y),
        }
    }

    fn drag(&mut self, mode: ToolMode, screen_pos: Vec2) {
        let Some((x, y)) = cell_under(screen_pos, self.config.cell_size, self.lattice.dimensions())
        else {
            return;
        };
        if !self.apply(mode, x, y) {
            return;
        }
        if let Some((m, cells)) = &mut self.current_edit {
            if *m == mode {
                cells.push((x, y));
                return;
            }
        }
        self.finalize_edit();
        self.current_edit = Some((mode, vec![(x, y)]));
    }

    fn finalize_edit(&mut self) {
        if let Some((mode, cells)) = self.current_edit.take() {
            let comm = match mode {
                ToolMode::Paint => Command::PaintBarrier(cells),
                ToolMode::Erase => Command::EraseBarrier(cells),
            };
            self.command_stack.record(comm);
        }
    }

    fn run_command(&mut self, comm: &Command) {
        let (mode, cells) = match comm {
            Command::PaintBarrier(cells) => (ToolMode::Paint, cells),
            Command::EraseBarrier(cells) => (ToolMode::Erase, cells),
        };
        for &(x, y) in cells {
            self.apply(mode, x, y);
        }
    }

    fn undo(&mut self) {
        self.finalize_edit();
        if let Some(comm) = self.command_stack.pop_undo() {
            self.run_command(&comm.clone().inverse());
            self.command_stack.push_redo(comm);
        }
    }

    fn redo(&mut self) {
        if let Some(comm) = self.command_stack.pop_redo() {
            self.run_command(&comm);
            self.command_stack.push_undo(comm);
        }
    }

    fn save_to_json(&self) {
        if let Some(path) = FileDialog::new().add_filter("json", &["json"]).save_file() {
            match self.config.save(&path) {
                Ok(()) => info!("saved channel config to {}", path.display()),
                Err(e) => error!("{}", e),
            }
        }
    }

    fn load_from_json(&mut self) {
        if let Some(path) = FileDialog::new().add_filter("json", &["json"]).pick_file() {
            match ChannelConfig::load(&path) {
                Ok(config) => {
                    info!("loaded channel config from {}", path.display());
                    self.replace_config(config);
                }
                Err(e) => error!("{}", e),
            }
        }
    }

    fn draw(&mut self) {
        clear_background(BLACK);

        let (nx, ny) = self.lattice.dimensions();
        for y in 0..ny {
            let row = image_row(y, ny);
            for x in 0..nx {
                let color = if self.lattice.is_solid(x, y) {
                    BLACK
                } else {
                    vorticity_color(self.lattice.vorticity(x, y), self.config.vorticity_scale)
                };
                self.image.set_pixel(x as u32, row, color);
            }
        }
        self.texture.update(&self.image);

        let (w, h) = self.config.window_size();
        draw_texture_ex(
            &self.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                ..Default::default()
            },
        );

        let status = format!(
            "step {}  x{}/frame{}  mass {:.2}  max |u| {:.3}",
            self.lattice.time_step(),
            self.steps_per_frame,
            if self.paused { " (paused)" } else { "" },
            self.lattice.total_mass(),
            self.lattice.max_speed(),
        );
        draw_text(&status, 8.0, 18.0, 20.0, DARKGRAY);
    }
}

fn initial_config() -> ChannelConfig {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        return ChannelConfig::default();
    };
    match ChannelConfig::load(&path) {
        Ok(config) => {
            info!("loaded channel config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("{}; falling back to the default channel", e);
            ChannelConfig::default()
        }
    }
}

#[macroquad::main("haywire")]
async fn main() {
    env_logger::init();

    let mut config = initial_config();
    let lattice = match scenario::build(&config) {
        Ok(lattice) => lattice,
        Err(e) => {
            warn!("{}; falling back to the default channel", e);
            config = ChannelConfig::default();
            match scenario::build(&config) {
                Ok(lattice) => lattice,
                Err(e) => {
                    error!("default channel is invalid: {}", e);
                    return;
                }
            }
        }
    };
    let mut viewer = Viewer::new(config, lattice);

    loop {
        let screen_pos = vec2(mouse_position().0, mouse_position().1);
        let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);

        if is_mouse_button_down(MouseButton::Left) {
            viewer.drag(ToolMode::Paint, screen_pos);
        } else if is_mouse_button_down(MouseButton::Right) {
            viewer.drag(ToolMode::Erase, screen_pos);
        } else {
            viewer.finalize_edit();
        }

        if ctrl && is_key_pressed(KeyCode::S) {
            viewer.save_to_json();
        }
        if ctrl && is_key_pressed(KeyCode::O) {
            viewer.load_from_json();
        }
        if ctrl && is_key_pressed(KeyCode::Z) {
            viewer.undo();
        }
        if ctrl && is_key_pressed(KeyCode::R) {
            viewer.redo();
        } else if is_key_pressed(KeyCode::R) {
            viewer.reset();
        }
        if is_key_pressed(KeyCode::P) {
            viewer.paused = !viewer.paused;
        }
        if is_key_pressed(KeyCode::Up) {
            viewer.steps_per_frame = (viewer.steps_per_frame + 5).min(MAX_STEPS_PER_FRAME);
        }
        if is_key_pressed(KeyCode::Down) {
            viewer.steps_per_frame = viewer.steps_per_frame.saturating_sub(5).max(1);
        }

        viewer.step();
        viewer.draw();

        next_frame().await;
    }
}
