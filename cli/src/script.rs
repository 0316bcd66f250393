use std::fmt;

use squzzle::input::{InputEvent, InputEventKind, WheelEvent};
use squzzle::PointerId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptStep {
    Pointer { event: InputEvent },
    Wheel(WheelEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    UnknownCommand { line: usize, word: String },
    MissingArgument { line: usize, name: &'static str },
    InvalidNumber { line: usize, value: String },
    TrailingInput { line: usize, rest: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::UnknownCommand { line, word } => {
                write!(f, "line {line}: unknown command {word:?}")
            }
            ScriptError::MissingArgument { line, name } => {
                write!(f, "line {line}: missing {name}")
            }
            ScriptError::InvalidNumber { line, value } => {
                write!(f, "line {line}: {value:?} is not a number")
            }
            ScriptError::TrailingInput { line, rest } => {
                write!(f, "line {line}: unexpected {rest:?}")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse a replay script. One step per line:
///
/// ```text
/// down <pointer> <x> <y> [shift]
/// move <pointer> <x> <y>
/// up <pointer>
/// cancel <pointer>
/// wheel <delta>
/// ```
///
/// `<pointer>` is `mouse` or a touch id. Blank lines and `#` comments are
/// skipped. Coordinates are viewport pixels.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let mut words = content.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let step = match command {
            "down" | "move" => {
                let pointer = parse_pointer(line, words.next())?;
                let x = parse_number(line, "x", words.next())?;
                let y = parse_number(line, "y", words.next())?;
                let kind = if command == "down" {
                    InputEventKind::Down
                } else {
                    InputEventKind::Move
                };
                let mut event = pointer_event(kind, pointer, x, y);
                if command == "down" {
                    if let Some(flag) = words.next() {
                        if flag != "shift" {
                            return Err(ScriptError::TrailingInput {
                                line,
                                rest: flag.to_string(),
                            });
                        }
                        event = event.with_shift();
                    }
                }
                ScriptStep::Pointer { event }
            }
            "up" | "cancel" => {
                let pointer = parse_pointer(line, words.next())?;
                let kind = if command == "up" {
                    InputEventKind::Up
                } else {
                    InputEventKind::Cancel
                };
                ScriptStep::Pointer {
                    event: pointer_event(kind, pointer, 0.0, 0.0),
                }
            }
            "wheel" => {
                let delta = parse_number(line, "delta", words.next())?;
                ScriptStep::Wheel(WheelEvent::new(delta))
            }
            other => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    word: other.to_string(),
                })
            }
        };
        let rest: Vec<&str> = words.collect();
        if !rest.is_empty() {
            return Err(ScriptError::TrailingInput {
                line,
                rest: rest.join(" "),
            });
        }
        steps.push(step);
    }
    Ok(steps)
}

fn pointer_event(kind: InputEventKind, pointer: PointerId, x: f32, y: f32) -> InputEvent {
    if pointer == PointerId::MOUSE {
        InputEvent::mouse(kind, x, y)
    } else {
        InputEvent::touch(kind, pointer.0, x, y)
    }
}

fn parse_pointer(line: usize, word: Option<&str>) -> Result<PointerId, ScriptError> {
    let word = word.ok_or(ScriptError::MissingArgument {
        line,
        name: "pointer",
    })?;
    if word == "mouse" {
        return Ok(PointerId::MOUSE);
    }
    word.parse::<i32>()
        .map(PointerId)
        .map_err(|_| ScriptError::InvalidNumber {
            line,
            value: word.to_string(),
        })
}

fn parse_number(line: usize, name: &'static str, word: Option<&str>) -> Result<f32, ScriptError> {
    let word = word.ok_or(ScriptError::MissingArgument { line, name })?;
    match word.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ScriptError::InvalidNumber {
            line,
            value: word.to_string(),
        }),
    }
}
