use clap::Parser;
use sarsa_lab::{
    cli::commands::train::{TrainArgs, execute},
    gridworld::{Move, Position},
    sarsa::SavedSarsaDriver,
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "sarsa-train",
        "sarsa",
        "--episodes",
        "5",
        "--seed",
        "11",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 5);
    assert_eq!(parsed["environment"], "corner");
    assert_eq!(parsed["sarsa"]["step_no"], 4);
    assert_eq!(parsed["seed"], 11);
}

#[test]
fn csv_has_one_row_per_episode() {
    let tmp = tempdir().unwrap();
    let csv_path = tmp.path().join("steps.csv");

    let args = parse_args([
        "sarsa-train",
        "random",
        "--episodes",
        "4",
        "--seed",
        "3",
        "--csv",
        csv_path.to_str().unwrap(),
    ]);

    execute(args).expect("random training should succeed");

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["episode", "steps"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row[0].parse::<usize>().unwrap(), index);
        assert!(row[1].parse::<usize>().unwrap() >= 10);
    }
}

#[test]
fn saved_driver_can_be_resumed() {
    let tmp = tempdir().unwrap();
    let first = tmp.path().join("first.msgpack");
    let second = tmp.path().join("second.msgpack");

    execute(parse_args([
        "sarsa-train",
        "sarsa",
        "--episodes",
        "20",
        "--seed",
        "5",
        "--output",
        first.to_str().unwrap(),
    ]))
    .expect("initial training should succeed");

    let saved = SavedSarsaDriver::<Position, Move>::load_from_file(&first).unwrap();
    assert_eq!(saved.metadata.episodes_trained, Some(20));
    assert!(!saved.q_table().is_empty());

    execute(parse_args([
        "sarsa-train",
        "sarsa",
        "--episodes",
        "10",
        "--seed",
        "6",
        "--resume",
        first.to_str().unwrap(),
        "--output",
        second.to_str().unwrap(),
    ]))
    .expect("resumed training should succeed");

    let resumed = SavedSarsaDriver::<Position, Move>::load_from_file(&second).unwrap();
    assert_eq!(resumed.metadata.episodes_trained, Some(30));
    assert!(resumed.q_table().len() >= saved.q_table().len());
}

#[test]
fn custom_map_is_used() {
    let tmp = tempdir().unwrap();
    let map_path = tmp.path().join("short.txt");
    std::fs::write(&map_path, "#####\n#S.G#\n#####\n").unwrap();
    let summary = tmp.path().join("short.json");

    execute(parse_args([
        "sarsa-train",
        "sarsa",
        "--episodes",
        "30",
        "--slip",
        "0",
        "--seed",
        "2",
        "--map",
        map_path.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
    ]))
    .expect("training on a custom map should succeed");

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(parsed["training"]["goals_reached"], 30);
    assert_eq!(parsed["metrics"]["best_steps"], 2);
}

#[test]
fn random_driver_cannot_be_saved() {
    let tmp = tempdir().unwrap();
    let output = tmp.path().join("random.msgpack");
    let err = execute(parse_args([
        "sarsa-train",
        "random",
        "--episodes",
        "1",
        "--output",
        output.to_str().unwrap(),
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("Only sarsa drivers"));
    assert!(!output.exists());
}
