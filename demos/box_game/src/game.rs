use anyhow::Result;
use boxengine::{Behaviour, EngineContext, Entity, Game, Rect, Surface};

const PLAYER_SIZE: f32 = 16.0;
const ENEMY_SIZE: f32 = 12.0;
const WAVE_SIZE: usize = 6;

/// Catch the roaming boxes. Each one caught scores a point; a new wave
/// arrives when the field is empty.
pub struct BoxGame {
    wave: u32,
}

impl BoxGame {
    pub fn new() -> Self {
        Self { wave: 0 }
    }

    fn spawn_wave(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.wave += 1;
        let (width, height) = ctx.surface().size();
        let margin = ctx.config().border_size + ENEMY_SIZE;

        for _ in 0..WAVE_SIZE {
            let x = margin + fastrand::f32() * (width - 2.0 * margin - ENEMY_SIZE);
            let y = margin + fastrand::f32() * (height - 2.0 * margin - ENEMY_SIZE);
            let enemy = Entity::enemy(Rect::try_new(x, y, ENEMY_SIZE, ENEMY_SIZE)?)?
                .with_speed(2.0)?
                .with_behaviour(Behaviour::Roam);
            ctx.world_mut().spawn(enemy);
        }

        // One falling box per wave.
        let dropper = Entity::enemy(Rect::try_new(width / 2.0, margin, ENEMY_SIZE, ENEMY_SIZE)?)?
            .with_gravity(true);
        ctx.world_mut().spawn(dropper);

        ctx.msg_print(&format!("Wave {}", self.wave));
        Ok(())
    }
}

impl Game for BoxGame {
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()> {
        ctx.draw_intro();
        ctx.place_borders()?;

        let (width, height) = ctx.surface().size();
        let player = Entity::player(Rect::try_new(
            (width - PLAYER_SIZE) / 2.0,
            (height - PLAYER_SIZE) / 2.0,
            PLAYER_SIZE,
            PLAYER_SIZE,
        )?)?
        .with_speed(4.0)?;
        ctx.world_mut().spawn(player);

        self.spawn_wave(ctx)?;
        log::info!("Arrow keys: move | Space: pause | Esc: quit");
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        ctx.tick()?;
        if ctx.is_paused() {
            return Ok(());
        }

        let Some(player) = ctx.world().player_id() else {
            return Ok(());
        };
        let caught = ctx.world().enemies_touching(player)?;
        for id in caught {
            let world = ctx.world_mut();
            if world.destroy(id)? {
                let score = world.add_score(1)?;
                log::debug!("caught {:?}, score {}", id, score);
            }
        }

        let remaining = ctx
            .world()
            .iter_enemies()
            .filter(|(_, enemy)| !enemy.is_border())
            .count();
        if remaining == 0 {
            let score = ctx.world().player()?.score();
            ctx.msg_print(&format!("Wave {} cleared with {} points", self.wave, score));
            self.spawn_wave(ctx)?;
        }

        Ok(())
    }
}
