//! Parametrized (Q-parameter) dialect
//!
//! Layout:
//! 1. `BEGIN PGM` and the parameter block. Q78-Q85 and Q96 are the editable
//!    inputs, Q86-Q95 and Q97 are derived from them symbolically.
//! 2. Safe startup: tool call, radius and datum reset, spindle on, move to
//!    origin, coolant.
//! 3. One labelled block per leg that advances the running values, moves,
//!    and either branches to the exit label or repeats itself.
//! 4. Return to origin at finish feed, spindle and coolant off.

use super::PROGRAM_NAME;
use crate::program::{format_number, ProgramText};
use crate::ramp_planner::{Leg, Run};
use cncwarmup_core::Configuration;

const SEPARATOR: &str = "=================================";

/// Safe Z height for the startup retract (mm)
const SAFE_Z: f64 = 200.0;

/// Text of one leg's labelled block
struct LegBlock {
    loop_label: u8,
    exit_label: u8,
    title: &'static str,
    axis_update: &'static str,
    axis_comment: &'static str,
    motion: &'static str,
    motion_comment: &'static str,
    exit_condition: &'static str,
    exit_comment: &'static str,
    end_comment: &'static str,
}

fn leg_block(leg: Leg) -> LegBlock {
    match leg {
        Leg::XOutbound => LegBlock {
            loop_label: 1,
            exit_label: 2,
            title: "Move from X+0 -> X+Q78",
            axis_update: "Q92 = Q92 + Q88",
            axis_comment: "Increment X-axis",
            motion: "L X+Q92 Y+0 R0 F+Q95",
            motion_comment: "Move to X max and Y 0 while ramping up feedrate",
            exit_condition: "Q92 = Q78",
            exit_comment: "If X-axis reaches Q78, end incrementing",
            end_comment: "End incrementing from X+0 -> X+Q78",
        },
        Leg::YOutbound => LegBlock {
            loop_label: 3,
            exit_label: 4,
            title: "Move from Y+0 -> Y+Q79",
            axis_update: "Q93 = Q93 + Q89",
            axis_comment: "Increment Y-axis",
            motion: "L X+Q78 Y+Q93 R0 F+Q95",
            motion_comment: "Move to X max and Y max while ramping up feedrate",
            exit_condition: "Q93 = Q79",
            exit_comment: "If Y-axis reaches Q79, end incrementing",
            end_comment: "End incrementing from Y+0 -> Y+Q79",
        },
        Leg::XReturn => LegBlock {
            loop_label: 5,
            exit_label: 6,
            title: "Move from X+Q78 -> X+0",
            axis_update: "Q92 = Q92 - Q88",
            axis_comment: "Decrement X-axis",
            motion: "L X+Q92 Y+Q79 R0 F+Q95",
            motion_comment: "Return to X0 with Y max while ramping up feedrate",
            exit_condition: "Q92 = 0",
            exit_comment: "If X-axis reaches 0, end incrementing",
            end_comment: "End incrementing from X+Q78 -> X+0",
        },
        Leg::YReturn => LegBlock {
            loop_label: 7,
            exit_label: 8,
            title: "Move from Y+Q79 -> Y+0",
            axis_update: "Q93 = Q93 - Q89",
            axis_comment: "Decrement Y-axis",
            motion: "L X+0 Y+Q93 R0 F+Q95",
            motion_comment: "Return to Y0 with X0 while ramping up feedrate",
            exit_condition: "Q93 LT",
            exit_comment: "If Y-axis reaches 0, end incrementing",
            end_comment: "End incrementing from Y+Q79 -> Y+0",
        },
    }
}

pub(super) fn emit(run: &Run, config: &Configuration) -> ProgramText {
    let mut program = ProgramText::new();

    program.code(format!("BEGIN PGM {} MM", PROGRAM_NAME));
    emit_parameters(&mut program, run, config);
    emit_startup(&mut program, config);
    for leg in Leg::ALL {
        emit_leg(&mut program, leg, run);
    }
    emit_closing(&mut program);
    program.code(format!("END PGM {} MM", PROGRAM_NAME));

    program
}

fn emit_parameters(program: &mut ProgramText, run: &Run, config: &Configuration) {
    program.comment("Heidenhain CNC Warmup Program");
    program.comment(SEPARATOR);
    program.comment("Editable Warmup Parameters:");
    program.directive(
        format!("Q78 = {}", format_number(config.travel_x)),
        "X-Axis Travel Limit",
    );
    program.directive(
        format!("Q79 = {}", format_number(config.travel_y)),
        "Y-Axis Travel Limit",
    );
    program.directive(
        format!("Q80 = {}", format_number(config.spindle_start)),
        "Start Spindle RPM",
    );
    program.directive(
        format!("Q81 = {}", format_number(config.spindle_finish)),
        "Finish Spindle RPM",
    );
    program.directive(
        format!("Q82 = {}", format_number(config.feed_start)),
        "Start Feedrate (mm/min)",
    );
    program.directive(
        format!("Q83 = {}", format_number(config.feed_finish)),
        "Finish Feedrate (mm/min)",
    );
    program.directive(
        format!("Q84 = {}", u8::from(config.coolant_enabled)),
        "Coolant (1 = ON, 0 = OFF)",
    );
    program.directive(
        format!("Q85 = {}", config.step_density),
        "Feedrate/spindle RPM ramp-up per move. Increase for more gradual ramp-up.",
    );
    program.directive(format!("Q96 = {}", config.tool_number), "Tool Call Number");
    program.comment(SEPARATOR);

    program.comment("Uneditable Warmup Variables For Program:");
    program.directive("Q86 = (Q81 - Q80) / 4", "Spindle RPM divided into # of moves");
    program.directive("Q87 = (Q83 - Q82) / 4", "Feedrate divided into # of moves");
    program.directive("Q88 = Q78 / Q85", "X-Axis increment per step");
    program.directive("Q89 = Q79 / Q85", "Y-Axis increment per step");
    program.directive("Q90 = Q86 / Q85", "Spindle RPM increment per step");
    program.directive("Q91 = Q87 / Q85", "Feedrate increment per step");
    program.directive("Q92 = 0", "Current X position");
    program.directive("Q93 = 0", "Current Y position");
    program.directive("Q94 = Q80", "Current Spindle RPM");
    program.directive("Q95 = Q82", "Current Feedrate");
    program.directive(
        "Q97 = Q85 - 1",
        "Repeat calls per move, the first pass runs before the call",
    );

    let derived = run.derived();
    program.comment(format!(
        "Per step: X {} mm, Y {} mm, spindle {} RPM, feed {} mm/min ({} moves)",
        format_number(derived.x_step_delta),
        format_number(derived.y_step_delta),
        format_number(derived.spindle_step_delta),
        format_number(derived.feed_step_delta),
        run.len()
    ));
    program.comment(SEPARATOR);
    program.blank();
}

fn emit_startup(program: &mut ProgramText, config: &Configuration) {
    program.comment("Safe startup regardless of current position, origin table, or tool offsets");
    program.directive("TOOL CALL Q96 Z S+Q80", "Call defined tool #");
    program.directive("L R0", "Reset tool radius compensation");
    program.directive("S+0 M3", "Start spindle at Q80 RPM");
    program.directive(
        format!("L Z+{} F+Q82", format_number(SAFE_Z)),
        "Retract the tool. Move to safe Z height",
    );
    program.directive("CYCL DEF 7.0 DATUM SHIFT", "Reset active datum shift");
    program.directive("CYCL DEF 7.1 X+0", "Reset X datum to 0");
    program.directive("CYCL DEF 7.2 Y+0", "Reset Y datum to 0");
    program.directive("CYCL DEF 7.3 Z+0", "Reset Z datum to 0");
    program.directive(
        "TRANS DATUM RESET",
        "Reset any active datum shifts/origin tables",
    );
    program.directive("S+Q80 M3", "Start spindle at Q80 RPM");
    program.directive("L X+0 Y+0 R0 F+Q82", "Move to origin");
    if config.coolant_enabled {
        program.directive("IF Q84 == 1 THEN M8", "Coolant ON before spindle ramp-up");
    }
}

fn emit_leg(program: &mut ProgramText, leg: Leg, run: &Run) {
    let block = leg_block(leg);
    let exit_condition = if leg.is_closing() {
        format!(
            "{} {}",
            block.exit_condition,
            format_number(run.closing_tolerance())
        )
    } else {
        block.exit_condition.to_string()
    };

    program.directive(format!("LBL {}", block.loop_label), block.title);
    program.directive(block.axis_update, block.axis_comment);
    program.directive("Q94 = Q94 + Q90", "Increment Spindle RPM");
    program.directive("Q95 = Q95 + Q91", "Increment Feedrate");
    program.directive("S+Q94 M3", "Gradually increasing spindle RPM");
    program.directive(block.motion, block.motion_comment);
    program.directive(
        format!("IF {} GOTO LBL{}", exit_condition, block.exit_label),
        block.exit_comment,
    );
    program.directive(
        format!("CALL LBL {} REP Q97", block.loop_label),
        "Repeat incrementing loop Q97 times",
    );
    program.directive(format!("LBL {}", block.exit_label), block.end_comment);
}

fn emit_closing(program: &mut ProgramText) {
    program.directive("L X0 Y0 R0 F+Q83", "Return to origin");
    program.directive("S+Q81 M3", "Final spindle speed Q81 RPM");
    program.directive("M5", "Spindle OFF");
    program.directive("M9", "Coolant OFF");
}
