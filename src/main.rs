use hanoi_ngin::{
    Engine, EngineConfig, flow,
    hanoi::{Hanoi, HanoiScene},
};

fn main() -> anyhow::Result<()> {
    let mut engine = Engine::new(EngineConfig {
        title: "Hanoi Tower".to_string(),
        ..Default::default()
    });

    let nodes = match std::env::args().nth(1) {
        Some(path) => {
            let root = engine.load_scene(&path)?;
            HanoiScene::locate(&mut engine, root)?
        }
        None => HanoiScene::build(&mut engine)?,
    };
    let game = Hanoi::new(&mut engine, nodes);

    flow::run(engine, game)
}
