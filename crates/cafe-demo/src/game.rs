//! Demo game shared by the desktop and browser entry points.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use cafe_engine::audio::{AudioSystem, NullAudio, PlayOptions};
use cafe_engine::coords::{Rect, Vec2};
use cafe_engine::core::{FrameCtx, LoopConfig, LoopDriver, TickCtx};
use cafe_engine::input::{InputMap, Key};
use cafe_engine::iso::{IsoProjection, Tile, TileMap};
use cafe_engine::paint::Color;
use cafe_engine::render::Renderer;
use cafe_engine::scene::{Scene, SceneCommand, SceneManager};
use cafe_engine::window::{Platform, Window, WindowConfig};

pub const TITLE: &str = "Cafe Demo";
const QUAD_SIZE: Vec2 = Vec2::new(48.0, 48.0);
const TILE_MARK: Vec2 = Vec2::new(6.0, 6.0);

/// Logical pixels per second.
const SPEED: f32 = 320.0;

pub fn window_config() -> WindowConfig {
    WindowConfig::default().title(TITLE).size(960, 540)
}

pub fn loop_config() -> LoopConfig {
    LoopConfig::default().tick_rate(60).frame_rate_cap(Some(144))
}

type SharedInput = Rc<RefCell<InputMap>>;

/// Wires input, audio and the scene stack into a loop over `platform`.
pub fn build<'a, P: Platform>(
    platform: &'a mut P,
    window: &'a mut P::Window,
    mut renderer: impl Renderer + 'a,
) -> Result<LoopDriver<'a, P>> {
    renderer.set_clear_color(Color::CORNFLOWER_BLUE);

    let audio = Rc::new(RefCell::new(NullAudio::new()));
    audio.borrow_mut().initialize()?;
    let blip = audio.borrow_mut().load_sound("assets/blip.wav")?;

    let input: SharedInput = Rc::new(RefCell::new(InputMap::new()));
    {
        let mut map = input.borrow_mut();
        map.add_standard_movement();
        map.define_action("pause").add_key(Key::P);
        map.on_action_pressed("confirm", {
            let audio = Rc::clone(&audio);
            move || {
                let mut audio = audio.borrow_mut();
                if let Some(channel) = audio.play_sound(blip, PlayOptions::default().volume(0.8)) {
                    log::info!("blip on channel {channel}");
                }
            }
        });
    }

    let mut scenes = SceneManager::new();
    scenes.set_transition_callback(|from, to| log::info!("scene {from:?} -> {to}"));
    scenes.push(Field::new(Rc::clone(&input)));
    scenes.process_pending();
    let scenes = Rc::new(RefCell::new(scenes));

    let driver = LoopDriver::new(platform, window, loop_config());

    let stop = driver.stop_handle();
    input
        .borrow_mut()
        .on_action_pressed("cancel", move || {
            stop.stop();
        });

    let driver = driver
        .on_update({
            let scenes = Rc::clone(&scenes);
            move |ctx: &mut TickCtx<'_>| {
                input.borrow_mut().update(ctx.input());
                scenes.borrow_mut().update(ctx)?;
                audio.borrow_mut().update();
                Ok(())
            }
        })
        .on_render(move |ctx| {
            let mut scenes = scenes.borrow_mut();
            renderer.begin_frame()?;
            renderer.clear();
            scenes.render(ctx, &mut renderer)?;
            renderer.end_frame()?;
            scenes.process_pending();
            Ok(())
        })
        .on_periodic(|ctx| {
            ctx.window.set_title(&format!("{TITLE} - {} fps", ctx.fps));
            Ok(())
        });

    Ok(driver)
}

/// Quad position at the last two ticks.
struct Body {
    previous: Vec2,
    current: Vec2,
}

impl Body {
    fn step(&mut self, velocity: Vec2, dt: f32, bounds: Vec2) {
        self.previous = self.current;

        let next = self.current + velocity * dt;
        self.current = Vec2::new(
            next.x.clamp(0.0, (bounds.x - QUAD_SIZE.x).max(0.0)),
            next.y.clamp(0.0, (bounds.y - QUAD_SIZE.y).max(0.0)),
        );
    }

    fn at(&self, alpha: f32) -> Vec2 {
        self.previous.lerp(self.current, alpha)
    }
}

fn logical_size(window: &dyn Window) -> Vec2 {
    let (w, h) = window.size();
    let scale = window.scale_factor() as f32;
    Vec2::new(w as f32 / scale, h as f32 / scale)
}

/// WASD-driven quad over an isometric floor.
struct Field {
    input: SharedInput,
    body: Body,
    floor: TileMap,
    projection: IsoProjection,
}

impl Field {
    fn new(input: SharedInput) -> Self {
        let start = Vec2::new(64.0, 64.0);
        let mut floor = TileMap::new(24, 24);
        floor.fill(Tile::new(1));

        let mut projection = IsoProjection::default();
        projection.set_camera(Vec2::new(-480.0, 0.0));

        Self {
            input,
            body: Body {
                previous: start,
                current: start,
            },
            floor,
            projection,
        }
    }
}

impl Scene for Field {
    fn name(&self) -> &str {
        "field"
    }

    fn update(&mut self, ctx: &mut TickCtx<'_>) -> Result<SceneCommand> {
        let input = self.input.borrow();
        if input.is_action_pressed(ctx.input(), "pause") {
            return Ok(SceneCommand::push(Pause {
                input: Rc::clone(&self.input),
            }));
        }

        let velocity = input.movement(ctx.input()) * SPEED;
        let bounds = logical_size(&*ctx.window);
        self.body.step(velocity, ctx.dt_secs(), bounds);
        Ok(SceneCommand::None)
    }

    fn render(&mut self, ctx: &mut FrameCtx<'_>, renderer: &mut dyn Renderer) -> Result<()> {
        let size = logical_size(&*ctx.window);
        let viewport = Rect::new(0.0, 0.0, size.x, size.y);
        let shade = Color::from_premul(0.2, 0.3, 0.5, 1.0);
        self.floor.for_each_visible(&self.projection, viewport, |tile| {
            renderer.draw_quad(tile.screen - TILE_MARK / 2.0, TILE_MARK, shade);
        });

        renderer.draw_quad(self.body.at(ctx.alpha), QUAD_SIZE, Color::WHITE);
        Ok(())
    }
}

/// Dims the field until P or Enter is pressed.
struct Pause {
    input: SharedInput,
}

impl Scene for Pause {
    fn name(&self) -> &str {
        "pause"
    }

    fn update(&mut self, ctx: &mut TickCtx<'_>) -> Result<SceneCommand> {
        let input = self.input.borrow();
        let resume = input.is_action_pressed(ctx.input(), "pause")
            || input.is_action_pressed(ctx.input(), "confirm");
        Ok(if resume {
            SceneCommand::Pop
        } else {
            SceneCommand::None
        })
    }

    fn render(&mut self, ctx: &mut FrameCtx<'_>, renderer: &mut dyn Renderer) -> Result<()> {
        renderer.draw_quad(
            Vec2::zero(),
            logical_size(&*ctx.window),
            Color::from_premul(0.0, 0.0, 0.0, 0.5),
        );
        Ok(())
    }
}
