use std::path::PathBuf;

use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use fogmap::app::{Control, Viewer};
use fogmap::config::Config;
use fogmap::graphics::GraphicsRenderer;
use fogmap::input::InputHandler;
use fogmap::map::BattleMap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::load()?;
    let map_path = std::env::args_os().nth(1).map(PathBuf::from);
    let map = match &map_path {
        Some(path) => BattleMap::load(path)?,
        None => config.default_map()?,
    };

    let (canvas_width, canvas_height) = map.pixel_size();
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(format!("fogmap - {}", map.id))
        .with_inner_size(winit::dpi::LogicalSize::new(
            canvas_width.saturating_mul(config.window_scale),
            canvas_height.saturating_mul(config.window_scale),
        ))
        .with_resizable(true)
        .build(&event_loop)?;

    let mut graphics = GraphicsRenderer::new(&window, canvas_width, canvas_height)?;
    let mut viewer = Viewer::new(&config, map, map_path);
    let mut input_handler = InputHandler::new();

    let size = window.inner_size();
    viewer.set_window_size(size.width, size.height);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => {
                let action = match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    WindowEvent::Resized(size) => {
                        graphics.resize(size.width, size.height);
                        viewer.set_window_size(size.width, size.height);
                        return;
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        input_handler.handle_keyboard_input(&input)
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        input_handler.handle_mouse_input(state, button)
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        input_handler.handle_cursor_moved(position)
                    }
                    WindowEvent::CursorLeft { .. } => input_handler.handle_cursor_left(),
                    _ => return,
                };

                if viewer.handle(action) == Control::Quit {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                viewer.sync_snapshot();
                if viewer.take_redraw() {
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                let snapshot = viewer.snapshot().clone();
                let (width, height) = snapshot.pixel_size();
                if graphics.canvas_size() != (width, height) {
                    graphics.set_canvas_size(width, height);
                    window.set_title(&format!("fogmap - {}", snapshot.id));
                }

                graphics.render(&snapshot, viewer.role(), &viewer.preview());

                if let Err(err) = graphics.present() {
                    log::error!("Render error: {}", err);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}
