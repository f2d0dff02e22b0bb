use super::*;
use jr_core::{ActorId, EventTrigger, HandlerId, StructuredProgram};

fn lines(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|line| (*line).to_string()).collect()
}

struct CatDog {
    program: StructuredProgram,
    stage: ActorId,
    stage_handler: HandlerId,
    cat: ActorId,
    cat_handler: HandlerId,
    dog: ActorId,
    dog_handler: HandlerId,
}

/// Stage with one empty handler, Cat with three lines, Dog with two.
fn cat_dog() -> CatDog {
    let mut program = StructuredProgram::new("Stage").expect("stage");
    let stage = program.stage().id();
    let stage_handler = program
        .insert_handler(stage, None, EventTrigger::GreenFlag)
        .expect("stage handler");

    let cat = program.append_sprite("Cat").expect("cat");
    let cat_handler = program
        .insert_handler(cat, None, EventTrigger::GreenFlag)
        .expect("cat handler");
    program
        .set_handler_body(
            cat,
            cat_handler,
            lines(&["let x = 1;", "let y = 2;", "print(x + y);"]),
        )
        .expect("cat body");

    let dog = program.append_sprite("Dog").expect("dog");
    let dog_handler = program
        .insert_handler(dog, None, EventTrigger::Clicked)
        .expect("dog handler");
    program
        .set_handler_body(dog, dog_handler, lines(&["let z = 3;", "print(z);"]))
        .expect("dog body");

    CatDog {
        program,
        stage,
        stage_handler,
        cat,
        cat_handler,
        dog,
        dog_handler,
    }
}

#[test]
fn cat_and_dog_scenario_flattens_to_five_lines() {
    let fixture = cat_dog();
    let flat = flatten(&fixture.program);

    assert_eq!(flat.line_count(), 5);
    assert_eq!(
        flat.text(),
        "let x = 1;\nlet y = 2;\nprint(x + y);\nlet z = 3;\nprint(z);"
    );
    assert_eq!(
        flat.source_map().entries(),
        [
            SourceMapEntry {
                start_line: 1,
                actor_id: fixture.stage,
                handler_id: fixture.stage_handler,
            },
            SourceMapEntry {
                start_line: 1,
                actor_id: fixture.cat,
                handler_id: fixture.cat_handler,
            },
            SourceMapEntry {
                start_line: 4,
                actor_id: fixture.dog,
                handler_id: fixture.dog_handler,
            },
        ]
    );

    let found = locate(flat.source_map(), 5).expect("line 5 should be located");
    assert_eq!(found.actor_id, fixture.dog);
    assert_eq!(found.handler_id, fixture.dog_handler);
    assert_eq!(found.line_within_handler, 2);
}

#[test]
fn flattening_twice_is_identical() {
    let fixture = cat_dog();
    assert_eq!(flatten(&fixture.program), flatten(&fixture.program));
}

#[test]
fn every_line_of_every_handler_locates_back_to_it() {
    let fixture = cat_dog();
    let flat = flatten(&fixture.program);
    for line in 1..=3 {
        let found = locate(flat.source_map(), line).expect("cat line");
        assert_eq!(found.handler_id, fixture.cat_handler);
        assert_eq!(found.line_within_handler, line);
    }
    assert_eq!(locate(flat.source_map(), 6), None);
}

#[test]
fn reorder_changes_flattening_after_rebuild() {
    let mut fixture = cat_dog();
    let before = flatten(&fixture.program);
    fixture
        .program
        .reorder_actors(&[fixture.stage, fixture.dog, fixture.cat])
        .expect("reorder");
    let after = flatten(&fixture.program);

    assert_ne!(before.text(), after.text());
    assert!(after.text().starts_with("let z = 3;"));
    let found = locate(after.source_map(), 1).expect("line 1");
    assert_eq!(found.actor_id, fixture.dog);
    verify_source_map(&fixture.program, after.source_map()).expect("map should verify");
}

#[test]
fn verify_source_map_catches_stale_maps() {
    let mut fixture = cat_dog();
    let stale = flatten(&fixture.program);
    fixture
        .program
        .set_handler_body(fixture.cat, fixture.cat_handler, lines(&["print(1);"]))
        .expect("body");

    let error = verify_source_map(&fixture.program, stale.source_map())
        .expect_err("stale map should fail");
    assert_eq!(error.code, "SOURCE_MAP_GAP");

    fixture
        .program
        .delete_handler(fixture.dog, fixture.dog_handler)
        .expect("delete");
    let error = verify_source_map(&fixture.program, stale.source_map())
        .expect_err("stale map should fail");
    assert_eq!(error.code, "SOURCE_MAP_COVERAGE");
}

#[test]
fn flattened_program_serializes_with_camel_case_keys() {
    let fixture = cat_dog();
    let value = serde_json::to_value(flatten(&fixture.program)).expect("serialize");
    assert_eq!(value["sourceMap"]["lineCount"], 5);
    assert_eq!(value["sourceMap"]["entries"][2]["startLine"], 4);
}

/// Deterministic pseudo-random sizes so the generated programs vary without
/// making the tests flaky.
fn next_size(state: &mut u32, bound: u32) -> usize {
    *state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    ((*state >> 16) % bound) as usize
}

fn generated_program(seed: u32) -> StructuredProgram {
    let mut state = seed;
    let mut program = StructuredProgram::new("Stage").expect("stage");
    let sprite_count = next_size(&mut state, 5);
    for index in 0..sprite_count {
        program
            .append_sprite(&format!("Sprite{}", index))
            .expect("sprite");
    }

    let actor_ids = program
        .actors()
        .iter()
        .map(|actor| actor.id())
        .collect::<Vec<_>>();
    for actor_id in actor_ids {
        for _ in 0..next_size(&mut state, 4) {
            let handler = program
                .insert_handler(actor_id, None, EventTrigger::GreenFlag)
                .expect("handler");
            let body = (0..next_size(&mut state, 4))
                .map(|line| format!("let v{} = {};", line, seed))
                .collect();
            program
                .set_handler_body(actor_id, handler, body)
                .expect("body");
        }
    }
    program
}

#[test]
fn generated_programs_keep_source_map_invariants() {
    for seed in 0..200u32 {
        let program = generated_program(seed);
        let flat = flatten(&program);
        let map = flat.source_map();

        assert_eq!(map.entries().len(), program.handler_count());
        verify_source_map(&program, map).expect("map should verify");
        assert_eq!(flat, flatten(&program));

        let covered = (0..map.entries().len())
            .filter_map(|index| map.line_range(index))
            .map(|range| range.len())
            .sum::<usize>();
        assert_eq!(covered, flat.line_count());

        for window in map.entries().windows(2) {
            assert!(window[0].start_line <= window[1].start_line);
        }

        for actor in program.actors() {
            for handler in actor.handlers() {
                if handler.body().is_empty() {
                    continue;
                }
                let start = flat
                    .handler_start_line(handler.id())
                    .expect("handler should be mapped");
                let found = locate(map, start).expect("start line should locate");
                assert_eq!(found.actor_id, actor.id());
                assert_eq!(found.handler_id, handler.id());
                assert_eq!(found.line_within_handler, 1);
            }
        }

        for line in 1..=flat.line_count() {
            assert!(locate(map, line).is_some());
        }
        assert!(locate(map, flat.line_count() + 1).is_none());
    }
}
