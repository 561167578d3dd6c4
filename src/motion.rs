use glam::DVec3;
use log::debug;

use crate::command::Command;
use crate::pose::AgentPose;

pub const MOVE_STEP: f64 = 0.1;
pub const TURN_STEP_DEGREES: f64 = 5.0;

/// Unit forward vector for a heading, left-handed: yaw 0 looks down -Z
pub fn forward_direction(yaw_degrees: f64) -> DVec3 {
    let yaw_rad = (-yaw_degrees).to_radians();
    DVec3::new(yaw_rad.sin(), 0.0, -yaw_rad.cos())
}

/// Sideways offset for strafe_left. strafe_right uses the negation.
fn strafe_left_direction(direction: DVec3) -> DVec3 {
    DVec3::new(direction.z, 0.0, direction.x)
}

/// Apply a batch of commands to a pose.
///
/// Turns are resolved first, in list order, and only then are the
/// translations applied along the post-turn heading. A `move_forward`
/// listed before a `turn_left` therefore still moves along the new
/// heading.
pub fn integrate(pose: AgentPose, commands: &[Command]) -> AgentPose {
    let mut yaw = pose.yaw;
    for command in commands.iter().filter(|c| c.is_turn()) {
        if *command == Command::TurnLeft {
            yaw += TURN_STEP_DEGREES;
        } else {
            yaw -= TURN_STEP_DEGREES;
        }
    }

    let direction = forward_direction(yaw);
    let mut position = pose.position;

    for command in commands {
        match command {
            Command::MoveForward => position += direction * MOVE_STEP,
            Command::MoveBackward => position -= direction * MOVE_STEP,
            Command::StrafeLeft => position += strafe_left_direction(direction) * MOVE_STEP,
            Command::StrafeRight => position += -strafe_left_direction(direction) * MOVE_STEP,
            Command::MoveUp => position.y += MOVE_STEP / 2.0,
            Command::MoveDown => position.y -= MOVE_STEP / 2.0,
            Command::TurnLeft | Command::TurnRight => {}
        }
    }

    AgentPose::new(position, yaw)
}

/// Parse raw tokens and integrate them. Unknown tokens are skipped.
pub fn integrate_tokens<S: AsRef<str>>(pose: AgentPose, tokens: &[S]) -> AgentPose {
    let commands = parse_commands(tokens);
    integrate(pose, &commands)
}

/// Keep the known commands of a token list, in order
pub fn parse_commands<S: AsRef<str>>(tokens: &[S]) -> Vec<Command> {
    tokens
        .iter()
        .filter_map(|token| match token.as_ref().parse::<Command>() {
            Ok(cmd) => Some(cmd),
            Err(e) => {
                debug!("Ignoring {}", e);
                None
            }
        })
        .collect()
}
