//! Flattened (literal) dialect
//!
//! For controllers without Q-parameter expressions. Only the start and end
//! state of the run are emitted: the tool traces the four corners of the
//! envelope at finish feed and the spindle jumps from its start to its
//! finish speed once the perimeter is closed.

use super::PROGRAM_NAME;
use crate::program::{format_number, format_signed, ProgramText};
use crate::ramp_planner::{Leg, Run};
use cncwarmup_core::Configuration;

const SEPARATOR: &str = "=================================";

/// Safe Z height before the first move (mm)
const SAFE_Z: f64 = 50.0;

pub(super) fn emit(run: &Run, config: &Configuration) -> ProgramText {
    let mut program = ProgramText::new();

    let (spindle_finish, feed_finish) = run
        .last()
        .map(|w| (w.spindle, w.feed))
        .unwrap_or((config.spindle_finish, config.feed_finish));
    let corner = |leg: Leg| run.corner(leg).unwrap_or_else(|| leg.end_corner(config));
    let (max_x, _) = corner(Leg::XOutbound);
    let (_, max_y) = corner(Leg::YOutbound);

    program.comment("Heidenhain CNC Warmup Program");
    program.comment(SEPARATOR);
    program.comment(format!(
        "Machine Travel: X{} Y{}",
        format_number(max_x),
        format_number(max_y)
    ));
    program.comment(format!(
        "Start Spindle RPM: {}",
        format_number(config.spindle_start)
    ));
    program.comment(format!(
        "Finish Spindle RPM: {}",
        format_number(spindle_finish)
    ));
    program.comment(format!(
        "Start Feedrate (mm/min): {}",
        format_number(config.feed_start)
    ));
    program.comment(format!(
        "Finish Feedrate (mm/min): {}",
        format_number(feed_finish)
    ));
    program.comment(format!(
        "Coolant: {}",
        if config.coolant_enabled { "ON" } else { "OFF" }
    ));
    program.comment(SEPARATOR);
    program.blank();

    program.code(format!("BEGIN PGM {} MM", PROGRAM_NAME));
    program.directive(
        format!("S{} M3", format_signed(config.spindle_start)),
        format!("Start spindle at {} RPM", format_number(config.spindle_start)),
    );
    program.directive(
        format!(
            "L Z{} F{}",
            format_number(SAFE_Z),
            format_signed(config.feed_start)
        ),
        "Move to safe Z height",
    );
    program.directive(
        format!("L X0 Y0 F{}", format_signed(config.feed_start)),
        "Move to origin",
    );

    let comments = [
        "Move to max X",
        "Move to max Y",
        "Return to Y max at X0",
        "Return to origin",
    ];
    for (leg, comment) in Leg::ALL.into_iter().zip(comments) {
        let (x, y) = corner(leg);
        let mut code = format!("L X{} Y{}", format_number(x), format_number(y));
        // Feed is modal, so only the first perimeter move sets it.
        if leg == Leg::XOutbound {
            code.push_str(&format!(" F{}", format_signed(feed_finish)));
        }
        program.directive(code, comment);
    }

    program.directive(
        format!("S{} M3", format_signed(spindle_finish)),
        format!("Ramp spindle to {} RPM", format_number(spindle_finish)),
    );
    if config.coolant_enabled {
        program.directive("M8", "Coolant ON");
    }
    program.directive("M5", "Spindle OFF");
    program.directive("M9", "Coolant OFF");
    program.code(format!("END PGM {} MM", PROGRAM_NAME));

    program
}
