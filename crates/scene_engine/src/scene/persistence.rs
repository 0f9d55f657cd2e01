//! Line-oriented scene text format
//!
//! ```text
//! SCENE_V1
//! <entity count>
//! "<name>"
//! "<geometry source>"            BUILTIN:<kind>, a file path or NONE
//! <px> <py> <pz>
//! <rx> <ry> <rz>                 Euler degrees
//! <sx> <sy> <sz>
//! <r> <g> <b>
//! <roughness>
//! <metallic>
//! "<texture path>"               NONE when untextured
//! <component count>
//! <TypeTag> <enabled> <fields...>   one line per component
//! ```
//!
//! Strings are double-quoted with `\"` and `\\` escapes, booleans are
//! written as `0` / `1`. A component whose tag the factory does not know is
//! skipped by discarding its line.

use std::fmt::Write as _;

use thiserror::Error;

use crate::assets::GeometrySource;
use crate::ecs::component::Component;
use crate::ecs::entity::{Entity, Material};
use crate::ecs::factory::ComponentFactory;
use crate::foundation::math::{Transform, Vec3};

/// First line of every scene file
pub const SCENE_HEADER: &str = "SCENE_V1";

/// Texture path written for untextured materials
pub const NO_TEXTURE: &str = "NONE";

/// Geometry source written for entities without geometry
pub const NO_GEOMETRY: &str = "NONE";

/// Malformed scene text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct SceneFormatError {
    /// 1-based line number
    pub line: usize,
    /// What went wrong
    pub message: String,
}

impl SceneFormatError {
    /// Create an error for a line
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Builds one line of space-separated fields
#[derive(Debug, Default)]
pub struct FieldWriter {
    line: String,
}

impl FieldWriter {
    /// Create an empty line
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str) {
        if !self.line.is_empty() {
            self.line.push(' ');
        }
        self.line.push_str(field);
    }

    /// Append an unquoted word
    pub fn write_word(&mut self, word: &str) {
        self.push(word);
    }

    /// Append a float
    pub fn write_f32(&mut self, value: f32) {
        self.push(&value.to_string());
    }

    /// Append three floats
    pub fn write_vec3(&mut self, value: Vec3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    /// Append `0` or `1`
    pub fn write_bool(&mut self, value: bool) {
        self.push(if value { "1" } else { "0" });
    }

    /// Append an unsigned integer
    pub fn write_usize(&mut self, value: usize) {
        self.push(&value.to_string());
    }

    /// Append a quoted, escaped string
    pub fn write_str(&mut self, value: &str) {
        self.push(&quote(value));
    }

    /// The finished line
    pub fn finish(self) -> String {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
}

/// Sequential reader over the fields of one line
pub struct FieldReader<'a> {
    tokens: std::slice::Iter<'a, Token>,
    line: usize,
}

impl<'a> FieldReader<'a> {
    fn new(tokens: &'a [Token], line: usize) -> Self {
        Self {
            tokens: tokens.iter(),
            line,
        }
    }

    /// Line number being read
    pub fn line(&self) -> usize {
        self.line
    }

    /// Fields not consumed yet
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    /// Error pointing at the current line
    pub fn error(&self, message: impl Into<String>) -> SceneFormatError {
        SceneFormatError::new(self.line, message)
    }

    /// Read an unquoted word
    pub fn read_word(&mut self) -> Result<&'a str, SceneFormatError> {
        match self.tokens.next() {
            Some(Token::Word(word)) => Ok(word),
            Some(Token::Quoted(text)) => Err(self.error(format!("expected a value, found string \"{}\"", text))),
            None => Err(self.error("unexpected end of line")),
        }
    }

    /// Read a float
    pub fn read_f32(&mut self) -> Result<f32, SceneFormatError> {
        let word = self.read_word()?;
        word.parse()
            .map_err(|_| self.error(format!("invalid number '{}'", word)))
    }

    /// Read three floats
    pub fn read_vec3(&mut self) -> Result<Vec3, SceneFormatError> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Read `0` / `1`
    pub fn read_bool(&mut self) -> Result<bool, SceneFormatError> {
        match self.read_word()? {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(self.error(format!("invalid flag '{}'", other))),
        }
    }

    /// Read an unsigned integer
    pub fn read_usize(&mut self) -> Result<usize, SceneFormatError> {
        let word = self.read_word()?;
        word.parse()
            .map_err(|_| self.error(format!("invalid count '{}'", word)))
    }

    /// Read a quoted string
    pub fn read_string(&mut self) -> Result<String, SceneFormatError> {
        match self.tokens.next() {
            Some(Token::Quoted(text)) => Ok(text.clone()),
            Some(Token::Word(word)) => Err(self.error(format!("expected a quoted string, found '{}'", word))),
            None => Err(self.error("unexpected end of line")),
        }
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn tokenize(text: &str, line: usize) -> Result<Vec<Token>, SceneFormatError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some(escaped) => value.push(escaped),
                        None => break,
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => value.push(c),
                }
            }
            if !closed {
                return Err(SceneFormatError::new(line, "unterminated string"));
            }
            tokens.push(Token::Quoted(value));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    Ok(tokens)
}

/// Non-blank lines with their 1-based numbers
struct LineCursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last: 0,
        }
    }

    fn next_line(&mut self, what: &str) -> Result<(usize, &'a str), SceneFormatError> {
        for (index, line) in self.lines.by_ref() {
            self.last = index + 1;
            if !line.trim().is_empty() {
                return Ok((index + 1, line));
            }
        }
        Err(SceneFormatError::new(self.last, format!("unexpected end of file, expected {}", what)))
    }

    /// Read a whole line as fields and hand it to `parse`, which must
    /// consume every field
    fn fields<T>(
        &mut self,
        what: &str,
        parse: impl FnOnce(&mut FieldReader<'_>) -> Result<T, SceneFormatError>,
    ) -> Result<T, SceneFormatError> {
        let (number, line) = self.next_line(what)?;
        let tokens = tokenize(line, number)?;
        let mut reader = FieldReader::new(&tokens, number);
        let value = parse(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(reader.error(format!("unexpected extra fields after {}", what)));
        }
        Ok(value)
    }
}

/// One entity as read from a scene file, before it joins a scene
#[derive(Debug)]
pub struct EntityRecord {
    /// Entity name
    pub name: String,
    /// Geometry source to resolve, if the entity had geometry
    pub source: Option<GeometrySource>,
    /// Transform
    pub transform: Transform,
    /// Material
    pub material: Material,
    /// Components in file order, unattached
    pub components: Vec<Component>,
}

/// Serialize entities in order
pub fn write_scene<'a, I>(entities: I) -> String
where
    I: ExactSizeIterator<Item = &'a Entity>,
{
    let mut out = String::new();
    let _ = writeln!(out, "{}", SCENE_HEADER);
    let _ = writeln!(out, "{}", entities.len());

    for entity in entities {
        let mut line = |fill: &dyn Fn(&mut FieldWriter)| {
            let mut writer = FieldWriter::new();
            fill(&mut writer);
            out.push_str(&writer.finish());
            out.push('\n');
        };

        let material = &entity.material;
        line(&|w| w.write_str(&entity.name));
        line(&|w| {
            let source = entity.geometry_source().map(GeometrySource::to_token);
            w.write_str(source.as_deref().unwrap_or(NO_GEOMETRY));
        });
        line(&|w| w.write_vec3(entity.transform.position));
        line(&|w| w.write_vec3(entity.transform.rotation));
        line(&|w| w.write_vec3(entity.transform.scale));
        line(&|w| w.write_vec3(material.color));
        line(&|w| w.write_f32(material.roughness));
        line(&|w| w.write_f32(material.metallic));
        line(&|w| w.write_str(material.texture.as_deref().unwrap_or(NO_TEXTURE)));
        line(&|w| w.write_usize(entity.components().len()));

        for component in entity.components() {
            line(&|w| {
                w.write_word(component.type_name());
                w.write_bool(component.enabled());
                component.kind().behaviour().save(w);
            });
        }
    }

    out
}

/// Parse scene text, constructing components through `factory`
///
/// Unknown component tags are logged and skipped; every other deviation
/// from the format is an error.
pub fn parse_scene(text: &str, factory: &ComponentFactory) -> Result<Vec<EntityRecord>, SceneFormatError> {
    let mut cursor = LineCursor::new(text);

    let (number, header) = cursor.next_line("header")?;
    if header.trim() != SCENE_HEADER {
        return Err(SceneFormatError::new(
            number,
            format!("expected header {}, found '{}'", SCENE_HEADER, header.trim()),
        ));
    }

    let count = cursor.fields("entity count", |r| r.read_usize())?;
    let mut records = Vec::with_capacity(count.min(1024));

    for _ in 0..count {
        let name = cursor.fields("entity name", |r| r.read_string())?;
        let source = cursor.fields("geometry source", |r| r.read_string())?;
        let position = cursor.fields("position", |r| r.read_vec3())?;
        let rotation = cursor.fields("rotation", |r| r.read_vec3())?;
        let scale = cursor.fields("scale", |r| r.read_vec3())?;
        let color = cursor.fields("color", |r| r.read_vec3())?;
        let roughness = cursor.fields("roughness", |r| r.read_f32())?;
        let metallic = cursor.fields("metallic", |r| r.read_f32())?;
        let texture = cursor.fields("texture", |r| r.read_string())?;
        let component_count = cursor.fields("component count", |r| r.read_usize())?;

        let mut components = Vec::with_capacity(component_count.min(64));
        for _ in 0..component_count {
            let (number, line) = cursor.next_line("component")?;
            let tokens = tokenize(line, number)?;
            let mut reader = FieldReader::new(&tokens, number);
            let tag = reader.read_word()?;

            let Some(mut component) = factory.create(tag) else {
                log::warn!("Scene: unknown component '{}' on line {}, skipping", tag, number);
                continue;
            };

            let enabled = reader.read_bool()?;
            component.kind_mut().behaviour_mut().load(&mut reader)?;
            component.set_enabled(enabled);
            if reader.remaining() > 0 {
                log::warn!(
                    "Scene: ignoring {} extra field(s) for '{}' on line {}",
                    reader.remaining(),
                    tag,
                    number
                );
            }
            components.push(component);
        }

        records.push(EntityRecord {
            name,
            source: (source != NO_GEOMETRY).then(|| GeometrySource::from_token(&source)),
            transform: Transform {
                position,
                rotation,
                scale,
            },
            material: Material {
                color,
                roughness,
                metallic,
                texture: (texture != NO_TEXTURE).then_some(texture),
            },
            components,
        });
    }

    Ok(records)
}
