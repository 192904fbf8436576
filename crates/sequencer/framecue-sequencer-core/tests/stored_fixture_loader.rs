use framecue_sequencer_core::{
    config::Config, engine::Engine, parse_op_json, procedure::Script, schedule::TaskState,
    timeline::NoopHost, PropPath, Value,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn path(s: &str) -> PropPath {
    PropPath::parse(s).unwrap()
}

fn float(engine: &Engine, p: &str) -> f32 {
    match engine.property_by_path(&path(p)) {
        Some(Value::Float(f)) => *f,
        other => panic!("expected float at '{p}', got {other:?}"),
    }
}

fn run_to(engine: &mut Engine, last: u64) {
    let mut host = NoopHost;
    while engine.current_frame() <= last {
        engine.step(&mut host).unwrap();
    }
}

#[test]
fn every_fixture_parses_and_validates() {
    for name in framecue_test_fixtures::op_names() {
        let json = framecue_test_fixtures::op_json(&name).unwrap();
        let op = parse_op_json(&json).unwrap_or_else(|e| panic!("fixture '{name}': {e}"));
        assert!(
            op.duration_frames().is_some(),
            "fixture '{name}' should be bounded"
        );
    }
}

#[test]
fn title_fade_fixture_runs_end_to_end() {
    let json = framecue_test_fixtures::op_json("title-fade").unwrap();
    let op = parse_op_json(&json).unwrap();
    assert_eq!(op.duration_frames(), Some(45));

    let mut engine = Engine::new(Config::default());
    engine.register_property(path("intro/title.opacity"), Value::f(0.0));
    let task = engine.spawn(Box::new(Script::single(op)));

    run_to(&mut engine, 20);
    approx(float(&engine, "intro/title.opacity"), 1.0, 1e-6);
    run_to(&mut engine, 45);
    approx(float(&engine, "intro/title.opacity"), 0.0, 1e-6);
    assert_eq!(engine.task_state(task), Some(TaskState::Completed));
}

#[test]
fn pulse_loop_fixture_repeats_from_live_values() {
    let json = framecue_test_fixtures::op_json("pulse-loop").unwrap();
    let op = parse_op_json(&json).unwrap();
    assert_eq!(op.duration_frames(), Some(12));

    let mut engine = Engine::new(Config::default());
    engine.register_property(path("stage/pulse.scale"), Value::f(1.0));
    let task = engine.spawn(Box::new(Script::single(op)));

    run_to(&mut engine, 12);
    approx(float(&engine, "stage/pulse.scale"), 1.0, 1e-6);
    assert_eq!(engine.task_state(task), Some(TaskState::Completed));
}

#[test]
fn prompt_stagger_fixture_finishes_last_child_latest() {
    let json = framecue_test_fixtures::op_json("prompt-stagger").unwrap();
    let op = parse_op_json(&json).unwrap();
    assert_eq!(op.duration_frames(), Some(13));

    let mut engine = Engine::new(Config::default());
    engine.register_property(path("outro/prompt-a.opacity"), Value::f(0.0));
    engine.register_property(path("outro/prompt-b.opacity"), Value::f(0.0));
    engine.register_property(path("outro/prompt-c.opacity"), Value::f(0.0));
    let task = engine.spawn(Box::new(Script::single(op)));

    run_to(&mut engine, 9);
    approx(float(&engine, "outro/prompt-a.opacity"), 1.0, 1e-6);
    approx(float(&engine, "outro/prompt-b.opacity"), 1.0, 1e-6);
    approx(float(&engine, "outro/prompt-c.opacity"), 0.0, 1e-6);
    assert_eq!(engine.task_state(task), Some(TaskState::Suspended));

    run_to(&mut engine, 13);
    approx(float(&engine, "outro/prompt-c.opacity"), 1.0, 1e-6);
    assert_eq!(engine.task_state(task), Some(TaskState::Completed));
}
