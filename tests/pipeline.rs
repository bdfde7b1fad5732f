// Copyright (c) 2024 Mike Tsao. All rights reserved.

use luminare::prelude::*;

// Demonstrates the full pipeline: a project document goes through the
// factory, tracks render frame by frame, and effect chains shape the output.
#[test]
fn demo_pipeline() {
    let factory = register_builtin_entities(EntityFactory::default());

    let project = Project {
        title: "Two Layers".to_string(),
        tempo: Tempo(120.0),
        tracks: vec![
            TrackSpec {
                name: "lead".to_string(),
                synthesizer: EntitySpec {
                    key: "bars".to_string(),
                    properties: vec![(
                        "max-height".to_string(),
                        PropertyValue::Float(6.0),
                    )],
                },
                effects: vec![
                    EntitySpec {
                        key: "radial-array".to_string(),
                        properties: vec![
                            ("copies".to_string(), PropertyValue::Int(2)),
                            ("radius".to_string(), PropertyValue::Float(1.0)),
                        ],
                    },
                    EntitySpec {
                        key: "echo".to_string(),
                        properties: vec![
                            ("delay".to_string(), PropertyValue::Float(1.0)),
                            ("feedback".to_string(), PropertyValue::Float(0.5)),
                        ],
                    },
                ],
                blocks: vec![MidiBlockBuilder::default()
                    .id(Uid(1))
                    .start(Beats(0.0))
                    .end(Beats(4.0))
                    .note(MidiNote::new_with(Uid(10), 60, 100, Beats(0.0), Beats(1.0)))
                    .note(MidiNote::new_with(Uid(11), 67, 90, Beats(2.0), Beats(1.0)))
                    .build()
                    .unwrap()],
            },
            TrackSpec {
                name: "pad".to_string(),
                synthesizer: EntitySpec {
                    key: "pulse-cube".to_string(),
                    properties: Vec::default(),
                },
                effects: Vec::default(),
                blocks: vec![MidiBlockBuilder::default()
                    .id(Uid(2))
                    .start(Beats(0.0))
                    .end(Beats(4.0))
                    .note(MidiNote::new_with(Uid(20), 48, 80, Beats(0.0), Beats(4.0)))
                    .build()
                    .unwrap()],
            },
        ],
    };

    let mut tracks = project.instantiate(&factory).unwrap();
    assert_eq!(tracks.len(), 2);

    // Frame in the middle of the first note: the lead's one bar becomes
    // three objects through the radial array; the pad contributes its cube.
    let objects_at = |tracks: &mut Vec<RealizedTrack>, beat: f64| {
        tracks
            .iter_mut()
            .map(|rt| {
                let blocks = rt.blocks.clone();
                rt.track
                    .render(Beats(beat), &blocks, Tempo(120.0))
                    .unwrap()
                    .len()
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(objects_at(&mut tracks, 0.5), vec![3, 1]);

    // One delay later, the snapshot taken at beat 0.5 replays: echo copies
    // join whatever the releasing note still produces.
    let counts = objects_at(&mut tracks, 1.5);
    assert!(counts[0] > 3, "echoes should fire one delay after the note");

    // Far past the end of everything: silence on both tracks.
    assert_eq!(objects_at(&mut tracks, 40.0), vec![0, 0]);

    // A snapshot of the live tracks round trips to an equivalent document.
    let snapshot = Project::snapshot("Two Layers", Tempo(120.0), &tracks);
    assert_eq!(snapshot.tracks.len(), 2);
    assert_eq!(snapshot.tracks[0].effects.len(), 2);
    let json = serde_json::to_string(&snapshot).unwrap();
    let reloaded: Project = serde_json::from_str(&json).unwrap();
    assert!(reloaded.instantiate(&factory).is_ok());
}
