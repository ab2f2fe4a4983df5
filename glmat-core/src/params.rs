//! Scene parameter files
//!
//! One `name = value` assignment per line, `#` comments, blank lines
//! ignored. Values are numbers, multiples of π (`pi`, `-pi`, `0.8pi`, `-0.5pi`),
//! `true`/`false`, or a bare word for enumerated settings:
//!
//! ```text
//! # slow spin around a distant F
//! z = -500
//! angle_y = 0.25pi
//! fov = 0.4pi
//! rotation_order = zyx
//! camera_radius = 400
//! ```

use std::f32::consts::PI;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, space0},
    combinator::{all_consuming, map, opt, recognize, value},
    multi::many0_count,
    number::complete::float,
    sequence::{delimited, pair, separated_pair},
    IResult,
};
use tracing::debug;

use crate::camera::{OrbitCamera, ProjectionMode};
use crate::error::{Error, ParamError, Result};
use crate::scene::{RotationOrder, SceneParams};

/// Right-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Bool(bool),
    Word(String),
}

/// One parsed `name = value` line
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub line: usize,
    pub name: String,
    pub value: Value,
}

/// Parse every assignment in `input`, stopping at the first bad line.
pub fn parse_assignments(input: &str) -> std::result::Result<Vec<Assignment>, ParamError> {
    let mut assignments = Vec::new();
    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        match all_consuming(parse_assignment)(text) {
            Ok((_, (name, value))) => assignments.push(Assignment {
                line,
                name: name.to_string(),
                value,
            }),
            Err(_) => {
                return Err(ParamError::Syntax {
                    line,
                    text: text.to_string(),
                })
            }
        }
    }
    Ok(assignments)
}

fn parse_assignment(input: &str) -> IResult<&str, (&str, Value)> {
    separated_pair(
        parse_name,
        delimited(space0, char('='), space0),
        parse_value,
    )(input)
}

fn parse_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), tag("true")),
        value(Value::Bool(false), tag("false")),
        parse_signed_pi,
        parse_number,
        map(alpha1, |word: &str| Value::Word(word.to_ascii_lowercase())),
    ))(input)
}

fn parse_signed_pi(input: &str) -> IResult<&str, Value> {
    let (input, sign) = opt(alt((char('-'), char('+'))))(input)?;
    let (input, _) = tag("pi")(input)?;
    let number = if sign == Some('-') { -PI } else { PI };
    Ok((input, Value::Number(number)))
}

fn parse_number(input: &str) -> IResult<&str, Value> {
    let (input, number) = float(input)?;
    let (input, pi) = opt(tag("pi"))(input)?;
    let number = if pi.is_some() { number * PI } else { number };
    Ok((input, Value::Number(number)))
}

impl Assignment {
    fn number(&self) -> std::result::Result<f32, ParamError> {
        match self.value {
            Value::Number(n) if n.is_finite() => Ok(n),
            _ => Err(self.wrong_type("a finite number")),
        }
    }

    fn flag(&self) -> std::result::Result<bool, ParamError> {
        match self.value {
            Value::Bool(b) => Ok(b),
            _ => Err(self.wrong_type("`true` or `false`")),
        }
    }

    fn word(&self) -> Option<&str> {
        match &self.value {
            Value::Word(w) => Some(w),
            _ => None,
        }
    }

    fn wrong_type(&self, expected: &'static str) -> ParamError {
        ParamError::WrongType {
            line: self.line,
            name: self.name.clone(),
            expected,
        }
    }
}

impl SceneParams {
    /// Apply one assignment on top of the current values.
    pub fn apply(&mut self, assignment: &Assignment) -> std::result::Result<(), ParamError> {
        let a = assignment;
        match a.name.as_str() {
            "x" => self.x = a.number()?,
            "y" => self.y = a.number()?,
            "z" => self.z = a.number()?,
            "angle_x" => self.angle_x = a.number()?,
            "angle_y" => self.angle_y = a.number()?,
            "angle_z" => self.angle_z = a.number()?,
            "scale_x" => self.scale_x = a.number()?,
            "scale_y" => self.scale_y = a.number()?,
            "scale_z" => self.scale_z = a.number()?,
            "fov" => self.lens.fov = a.number()?,
            "z_near" => self.lens.near = a.number()?,
            "z_far" => self.lens.far = a.number()?,
            "animate" => self.animate = a.flag()?,
            "camera" => {
                self.camera = if a.flag()? {
                    Some(self.camera.unwrap_or_default())
                } else {
                    None
                }
            }
            "camera_angle" => {
                let angle = a.number()?;
                self.camera.get_or_insert_with(OrbitCamera::default).angle = angle;
            }
            "camera_radius" => {
                let radius = a.number()?;
                self.camera.get_or_insert_with(OrbitCamera::default).radius = radius;
            }
            "rotation_order" => {
                self.rotation_order = match a.word() {
                    Some("xyz") => RotationOrder::Xyz,
                    Some("zyx") => RotationOrder::Zyx,
                    _ => return Err(a.wrong_type("`xyz` or `zyx`")),
                }
            }
            "projection" => {
                let mode = match a.word() {
                    Some("perspective") => ProjectionMode::Perspective,
                    Some("orthographic") => ProjectionMode::Orthographic,
                    _ => return Err(a.wrong_type("`perspective` or `orthographic`")),
                };
                self.set_projection_mode(mode);
            }
            _ => {
                return Err(ParamError::UnknownName {
                    line: a.line,
                    name: a.name.clone(),
                })
            }
        }
        Ok(())
    }

    /// Read a parameter file, applying it over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let params = text.parse::<Self>()?;
        debug!(path = %path.display(), "loaded scene parameters");
        Ok(params)
    }
}

impl FromStr for SceneParams {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut params = SceneParams::default();
        let assignments = parse_assignments(s)?;
        for assignment in &assignments {
            params.apply(assignment)?;
        }
        debug!(count = assignments.len(), "applied scene parameter overrides");
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_values() {
        let parsed = parse_assignments(
            "x = 12.5\nangle_y=0.25pi\nfov = pi\nanimate = false\nrotation_order = ZYX\n",
        )
        .unwrap();
        let values: Vec<_> = parsed.iter().map(|a| a.value.clone()).collect();
        assert_eq!(values[0], Value::Number(12.5));
        assert_eq!(values[1], Value::Number(0.25 * PI));
        assert_eq!(values[2], Value::Number(PI));
        assert_eq!(values[3], Value::Bool(false));
        assert_eq!(values[4], Value::Word("zyx".into()));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let parsed = parse_assignments("# header\n\n   z = -500   # push back\n\t\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].line, 3);
        assert_eq!(parsed[0].name, "z");
        assert_eq!(parsed[0].value, Value::Number(-500.0));
    }

    #[test]
    fn test_negative_pi_multiple() {
        let parsed = parse_assignments("angle_z = -0.5pi").unwrap();
        assert_eq!(parsed[0].value, Value::Number(-0.5 * PI));

        let parsed = parse_assignments("angle_z = -pi\nangle_x = +pi").unwrap();
        assert_eq!(parsed[0].value, Value::Number(-PI));
        assert_eq!(parsed[1].value, Value::Number(PI));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for text in ["z = nan", "x = 1\nfov = inf", "y = 1e39"] {
            let err = text.parse::<SceneParams>().unwrap_err();
            match err {
                Error::Params(ParamError::WrongType { expected, .. }) => {
                    assert_eq!(expected, "a finite number")
                }
                other => panic!("`{text}` should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse_assignments("x = 1\ny 2\n").unwrap_err();
        assert_eq!(
            err,
            ParamError::Syntax {
                line: 2,
                text: "y 2".into()
            }
        );

        let err = parse_assignments("x = 1 2").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_scene_params_from_str() {
        let params: SceneParams = "z = -500\nscale_x = -1\nfov = 0.4pi\nz_far = 2000\ncamera_angle = 0.5pi\n"
            .parse()
            .unwrap();
        assert_eq!(params.z, -500.0);
        assert_eq!(params.scale_x, -1.0);
        assert_abs_diff_eq!(params.lens.fov, 0.4 * PI);
        assert_eq!(params.lens.far, 2000.0);

        let camera = params.camera.unwrap();
        assert_abs_diff_eq!(camera.angle, 0.5 * PI);
        assert_eq!(camera.radius, OrbitCamera::default().radius);

        // Untouched fields keep the demo defaults.
        assert_eq!(params.angle_z, PI);
        assert!(params.animate);
    }

    #[test]
    fn test_enumerated_settings() {
        let params: SceneParams = "rotation_order = zyx\nprojection = orthographic\ncamera = true"
            .parse()
            .unwrap();
        assert_eq!(params.rotation_order, RotationOrder::Zyx);
        assert_eq!(params.lens.mode, ProjectionMode::Orthographic);
        assert!(params.camera.is_some());

        let params: SceneParams = "camera_radius = 10\ncamera = false".parse().unwrap();
        assert!(params.camera.is_none());
    }

    #[test]
    fn test_unknown_name() {
        let err = "x = 1\nfovy = 1".parse::<SceneParams>().unwrap_err();
        assert!(matches!(
            err,
            Error::Params(ParamError::UnknownName { line: 2, ref name }) if name == "fovy"
        ));
    }

    #[test]
    fn test_wrong_type() {
        let err = "animate = 1".parse::<SceneParams>().unwrap_err();
        assert!(matches!(
            err,
            Error::Params(ParamError::WrongType { line: 1, .. })
        ));

        let err = "rotation_order = yxz".parse::<SceneParams>().unwrap_err();
        assert!(err.to_string().contains("`xyz` or `zyx`"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneParams::load("/nonexistent/scene.params").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
