use cncwarmup_camtools::emitter::{emit, emit_tagged, Dialect};
use cncwarmup_camtools::program::ProgramText;
use cncwarmup_camtools::ramp_planner::{plan, RampPlanner};
use cncwarmup_core::{Configuration, EmitError};
use std::collections::BTreeSet;

fn reference_config() -> Configuration {
    Configuration {
        travel_x: 762.0,
        travel_y: 508.0,
        spindle_start: 500.0,
        spindle_finish: 3000.0,
        feed_start: 200.0,
        feed_finish: 800.0,
        coolant_enabled: true,
        step_density: 20,
        tool_number: 1,
    }
}

fn generate(config: &Configuration, dialect: Dialect) -> ProgramText {
    let run = plan(config).unwrap();
    emit(&run, config, dialect).unwrap()
}

fn call_labels(program: &ProgramText) -> BTreeSet<String> {
    program
        .directives()
        .filter_map(|code| code.strip_prefix("CALL LBL "))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

const REFERENCE_FLATTENED: &str = "\
; Heidenhain CNC Warmup Program
; =================================
; Machine Travel: X762 Y508
; Start Spindle RPM: 500
; Finish Spindle RPM: 3000
; Start Feedrate (mm/min): 200
; Finish Feedrate (mm/min): 800
; Coolant: ON
; =================================

BEGIN PGM WARMUP MM
S+500 M3 ; Start spindle at 500 RPM
L Z50 F+200 ; Move to safe Z height
L X0 Y0 F+200 ; Move to origin
L X762 Y0 F+800 ; Move to max X
L X762 Y508 ; Move to max Y
L X0 Y508 ; Return to Y max at X0
L X0 Y0 ; Return to origin
S+3000 M3 ; Ramp spindle to 3000 RPM
M8 ; Coolant ON
M5 ; Spindle OFF
M9 ; Coolant OFF
END PGM WARMUP MM";

#[test]
fn test_flattened_reference_program() {
    let program = generate(&reference_config(), Dialect::Flattened);
    assert_eq!(program.to_string(), REFERENCE_FLATTENED);
}

#[test]
fn test_flattened_traces_the_perimeter() {
    let program = generate(&reference_config(), Dialect::Flattened);
    let motions: Vec<&str> = program
        .directives()
        .filter(|code| code.starts_with("L "))
        .collect();
    assert_eq!(
        motions,
        vec![
            "L Z50 F+200",
            "L X0 Y0 F+200",
            "L X762 Y0 F+800",
            "L X762 Y508",
            "L X0 Y508",
            "L X0 Y0",
        ]
    );
}

#[test]
fn test_flattened_has_no_variables_or_loops() {
    let program = generate(&reference_config(), Dialect::Flattened);
    for code in program.directives() {
        assert!(!code.contains('='), "assignment in {:?}", code);
        assert!(!code.contains('Q'), "parameter in {:?}", code);
        assert!(!code.contains("LBL"), "label in {:?}", code);
        assert!(!code.contains("REP"), "loop in {:?}", code);
    }
}

#[test]
fn test_flattened_inlines_fractional_values() {
    let config = Configuration {
        travel_x: 600.25,
        travel_y: 400.5,
        spindle_start: 750.5,
        ..reference_config()
    };
    let text = generate(&config, Dialect::Flattened).to_string();
    assert!(text.contains("L X600.25 Y0 F+800"));
    assert!(text.contains("L X600.25 Y400.5"));
    assert!(text.contains("S+750.5 M3"));
}

#[test]
fn test_parametrized_declares_parameters() {
    let program = generate(&reference_config(), Dialect::Parametrized);
    let text = program.to_string();

    assert!(text.starts_with("BEGIN PGM WARMUP MM\n"));
    assert!(text.ends_with("END PGM WARMUP MM"));
    for expected in [
        "Q78 = 762 ; X-Axis Travel Limit",
        "Q79 = 508 ; Y-Axis Travel Limit",
        "Q80 = 500 ; Start Spindle RPM",
        "Q81 = 3000 ; Finish Spindle RPM",
        "Q82 = 200 ; Start Feedrate (mm/min)",
        "Q83 = 800 ; Finish Feedrate (mm/min)",
        "Q84 = 1 ; Coolant (1 = ON, 0 = OFF)",
        "Q85 = 20 ; Feedrate/spindle RPM ramp-up per move. Increase for more gradual ramp-up.",
        "Q96 = 1 ; Tool Call Number",
        "Q86 = (Q81 - Q80) / 4 ; Spindle RPM divided into # of moves",
        "Q90 = Q86 / Q85 ; Spindle RPM increment per step",
        "Q97 = Q85 - 1",
    ] {
        assert!(text.contains(expected), "missing {:?}", expected);
    }
}

#[test]
fn test_parametrized_has_four_loop_labels() {
    let program = generate(&reference_config(), Dialect::Parametrized);
    let labels = call_labels(&program);
    assert_eq!(labels.len(), 4);
    assert_eq!(
        labels,
        ["1", "3", "5", "7"]
            .iter()
            .map(|s| s.to_string())
            .collect::<BTreeSet<String>>()
    );
}

#[test]
fn test_parametrized_leg_block() {
    let text = generate(&reference_config(), Dialect::Parametrized).to_string();
    let block = "\
LBL 1 ; Move from X+0 -> X+Q78
Q92 = Q92 + Q88 ; Increment X-axis
Q94 = Q94 + Q90 ; Increment Spindle RPM
Q95 = Q95 + Q91 ; Increment Feedrate
S+Q94 M3 ; Gradually increasing spindle RPM
L X+Q92 Y+0 R0 F+Q95 ; Move to X max and Y 0 while ramping up feedrate
IF Q92 = Q78 GOTO LBL2 ; If X-axis reaches Q78, end incrementing
CALL LBL 1 REP Q97 ; Repeat incrementing loop Q97 times
LBL 2 ; End incrementing from X+0 -> X+Q78";
    assert!(text.contains(block));
}

#[test]
fn test_parametrized_exit_conditions() {
    let program = generate(&reference_config(), Dialect::Parametrized);
    let exits: Vec<&str> = program
        .directives()
        .filter(|code| code.starts_with("IF ") && code.contains("GOTO"))
        .collect();
    assert_eq!(
        exits,
        vec![
            "IF Q92 = Q78 GOTO LBL2",
            "IF Q93 = Q79 GOTO LBL4",
            "IF Q92 = 0 GOTO LBL6",
            "IF Q93 LT 1 GOTO LBL8",
        ]
    );
}

#[test]
fn test_parametrized_closing_guard_follows_planner_tolerance() {
    let config = reference_config();
    let run = RampPlanner::new()
        .with_closing_tolerance(0.5)
        .plan(&config)
        .unwrap();
    let text = emit(&run, &config, Dialect::Parametrized)
        .unwrap()
        .to_string();
    assert!(text.contains("IF Q93 LT 0.5 GOTO LBL8"));
}

#[test]
fn test_parametrized_closing_sequence() {
    let text = generate(&reference_config(), Dialect::Parametrized).to_string();
    assert!(text.ends_with(
        "\
L X0 Y0 R0 F+Q83 ; Return to origin
S+Q81 M3 ; Final spindle speed Q81 RPM
M5 ; Spindle OFF
M9 ; Coolant OFF
END PGM WARMUP MM"
    ));
}

#[test]
fn test_coolant_directive_follows_configuration() {
    for dialect in Dialect::ALL {
        for coolant_enabled in [true, false] {
            let config = Configuration {
                coolant_enabled,
                ..reference_config()
            };
            let program = generate(&config, dialect);
            let coolant_on = program
                .directives()
                .filter(|code| code.ends_with("M8"))
                .count();
            assert_eq!(coolant_on, usize::from(coolant_enabled), "{}", dialect);
            // Coolant off is always part of the closing sequence.
            assert!(program.directives().any(|code| code == "M9"));
        }
    }
}

#[test]
fn test_parametrized_coolant_flag_value() {
    let config = Configuration {
        coolant_enabled: false,
        ..reference_config()
    };
    let text = generate(&config, Dialect::Parametrized).to_string();
    assert!(text.contains("Q84 = 0 ; Coolant (1 = ON, 0 = OFF)"));
    assert!(!text.contains("THEN M8"));
}

#[test]
fn test_emit_tagged_rejects_unknown_dialect() {
    let config = reference_config();
    let run = plan(&config).unwrap();
    let err = emit_tagged(&run, &config, "fanuc").unwrap_err();
    assert_eq!(err, EmitError::UnsupportedDialect("fanuc".to_string()));

    let program = emit_tagged(&run, &config, "flattened").unwrap();
    assert_eq!(program.to_string(), REFERENCE_FLATTENED);
}

#[test]
fn test_huge_travel_is_written_without_exponent() {
    let config = Configuration {
        travel_x: 1.0e305,
        ..reference_config()
    };
    for dialect in Dialect::ALL {
        let text = generate(&config, dialect).to_string();
        assert!(!text.contains("inf"), "{}", dialect);
        assert!(!text.contains("e305"), "{}", dialect);
    }

    let text = generate(&config, Dialect::Parametrized).to_string();
    let q78 = text
        .lines()
        .find(|line| line.starts_with("Q78 = "))
        .unwrap();
    assert!(q78.starts_with("Q78 = 1000000000000000"));
}
