use super::error::PlanError;
use crate::registry::{FieldId, FieldKind, FieldRegistry};

/// Fixed-width value decoded by a field step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    U8,
    U16,
    U32,
    I16,
    I32,
    Oui,
    Mac,
    Ipv4,
    Uuid,
}

impl Scalar {
    fn field_kind(self) -> FieldKind {
        match self {
            Scalar::U8 => FieldKind::Uint8,
            Scalar::U16 => FieldKind::Uint16,
            Scalar::U32 => FieldKind::Uint32,
            Scalar::I16 => FieldKind::Int16,
            Scalar::I32 => FieldKind::Int32,
            Scalar::Oui => FieldKind::Uint24,
            Scalar::Mac => FieldKind::Ether,
            Scalar::Ipv4 => FieldKind::Ipv4,
            Scalar::Uuid => FieldKind::Guid,
        }
    }
}

/// Shape of one plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A scalar decoded into the field registered for its step.
    Field { scalar: Scalar, field: FieldId },
    Padding(usize),
    Align4,
    UserData(usize),
    Bytes(usize),
    Fragment(usize),
    Undecoded(usize),
    Malformed(usize),
    /// Undecoded remainder of the frame.
    Rest,
}

/// Shape as written, before a field is registered for it.
enum Parsed {
    Scalar(Scalar),
    Region(Shape),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub shape: Shape,
}

/// Ordered field shapes applied to a frame from offset zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodePlan {
    steps: Vec<Step>,
}

impl DecodePlan {
    /// Parse a comma-separated plan such as `"frame_id=u16,mac,align4,rest"`
    /// and register a field for every scalar step.
    ///
    /// # Examples
    /// ```
    /// use pnfield_core::{DecodePlan, FieldRegistry, Shape};
    ///
    /// let mut registry = FieldRegistry::new();
    /// let plan = DecodePlan::parse("frame_id=u16, pad:2, rest", &mut registry)?;
    /// assert_eq!(plan.steps()[0].label, "frame_id");
    /// assert_eq!(plan.steps()[1].shape, Shape::Padding(2));
    /// # Ok::<(), pnfield_core::PlanError>(())
    /// ```
    pub fn parse(text: &str, registry: &mut FieldRegistry) -> Result<Self, PlanError> {
        let items: Vec<&str> = text
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect();
        if items.is_empty() {
            return Err(PlanError::Empty);
        }

        let mut steps = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let (label, shape_text) = match item.split_once('=') {
                Some((label, shape_text)) => {
                    let label = label.trim();
                    if label.is_empty() {
                        return Err(PlanError::EmptyLabel { index });
                    }
                    (Some(label), shape_text.trim())
                }
                None => (None, *item),
            };
            let parsed = parse_shape(index, shape_text)?;
            if matches!(parsed, Parsed::Region(Shape::Rest)) && index + 1 != items.len() {
                return Err(PlanError::RestNotLast { index });
            }

            let name = shape_text.split(':').next().unwrap_or(shape_text).trim();
            let label = label.unwrap_or(name).to_string();
            let shape = match parsed {
                Parsed::Scalar(scalar) => Shape::Field {
                    scalar,
                    field: registry.register(
                        &label,
                        &format!("plan.{}", abbrev_of(&label)),
                        scalar.field_kind(),
                    ),
                },
                Parsed::Region(shape) => shape,
            };
            steps.push(Step { label, shape });
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

fn abbrev_of(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn parse_shape(index: usize, shape_text: &str) -> Result<Parsed, PlanError> {
    let (name, length) = match shape_text.split_once(':') {
        Some((name, length)) => (name.trim(), Some(length.trim())),
        None => (shape_text.trim(), None),
    };
    let name = name.to_ascii_lowercase();

    let fixed = match name.as_str() {
        "u8" => Some(Parsed::Scalar(Scalar::U8)),
        "u16" => Some(Parsed::Scalar(Scalar::U16)),
        "u32" => Some(Parsed::Scalar(Scalar::U32)),
        "i16" => Some(Parsed::Scalar(Scalar::I16)),
        "i32" => Some(Parsed::Scalar(Scalar::I32)),
        "oui" => Some(Parsed::Scalar(Scalar::Oui)),
        "mac" => Some(Parsed::Scalar(Scalar::Mac)),
        "ipv4" => Some(Parsed::Scalar(Scalar::Ipv4)),
        "uuid" => Some(Parsed::Scalar(Scalar::Uuid)),
        "align4" => Some(Parsed::Region(Shape::Align4)),
        "rest" => Some(Parsed::Region(Shape::Rest)),
        _ => None,
    };
    if let Some(parsed) = fixed {
        if length.is_some() {
            return Err(PlanError::UnexpectedLength { index, shape: name });
        }
        return Ok(parsed);
    }

    let sized: fn(usize) -> Shape = match name.as_str() {
        "pad" => Shape::Padding,
        "user" => Shape::UserData,
        "bytes" => Shape::Bytes,
        "frag" => Shape::Fragment,
        "undecoded" => Shape::Undecoded,
        "malformed" => Shape::Malformed,
        _ => {
            return Err(PlanError::UnknownShape {
                index,
                shape: name.clone(),
            });
        }
    };
    let length = length.ok_or_else(|| PlanError::MissingLength {
        index,
        shape: name.clone(),
    })?;
    let value = length
        .parse::<usize>()
        .map_err(|_| PlanError::InvalidLength {
            index,
            value: length.to_string(),
        })?;
    Ok(Parsed::Region(sized(value)))
}
