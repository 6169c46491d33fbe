// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declared parameter types
//!
//! Types have a textual form (`Array[File]+?`, `Map[String,Int]`) which is
//! what documents carry and what every diagnostic prints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid type `{text}`: {reason}")]
pub struct TypeParseError {
    pub text: String,
    pub reason: String,
}

/// Shape of a type, without its optional quantifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Boolean,
    Int,
    Float,
    String,
    File,
    Directory,
    Array { item: Box<Type>, nonempty: bool },
    Map { key: Box<Type>, value: Box<Type> },
    Pair { left: Box<Type>, right: Box<Type> },
    /// Members are empty until the loader resolves the struct by name
    Struct { name: String, members: Vec<(String, Type)> },
    Any,
}

/// A declared type with its `?` quantifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Type {
    pub kind: TypeKind,
    pub optional: bool,
}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn boolean() -> Self {
        Self::new(TypeKind::Boolean)
    }

    pub fn int() -> Self {
        Self::new(TypeKind::Int)
    }

    pub fn float() -> Self {
        Self::new(TypeKind::Float)
    }

    pub fn string() -> Self {
        Self::new(TypeKind::String)
    }

    pub fn file() -> Self {
        Self::new(TypeKind::File)
    }

    pub fn directory() -> Self {
        Self::new(TypeKind::Directory)
    }

    pub fn any() -> Self {
        Self::new(TypeKind::Any)
    }

    pub fn array(item: Type, nonempty: bool) -> Self {
        Self::new(TypeKind::Array {
            item: Box::new(item),
            nonempty,
        })
    }

    pub fn map(key: Type, value: Type) -> Self {
        Self::new(TypeKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn pair(left: Type, right: Type) -> Self {
        Self::new(TypeKind::Pair {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn structure(name: impl Into<String>, members: Vec<(String, Type)>) -> Self {
        Self::new(TypeKind::Struct {
            name: name.into(),
            members,
        })
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    /// Item type when this is an array
    pub fn array_item(&self) -> Option<&Type> {
        match &self.kind {
            TypeKind::Array { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Whether a value of this type may be used where `target` is expected.
    ///
    /// With `check_quant` off, optional values may flow into non-optional
    /// slots and a lone `T` may flow into `Array[T]`.
    pub fn coerces(&self, target: &Type, check_quant: bool) -> bool {
        if matches!(target.kind, TypeKind::Any) || matches!(self.kind, TypeKind::Any) {
            return true;
        }
        if check_quant && self.optional && !target.optional {
            return false;
        }
        let shape = match (&self.kind, &target.kind) {
            (TypeKind::Int, TypeKind::Float) => true,
            (TypeKind::String, TypeKind::File | TypeKind::Directory) => true,
            (
                TypeKind::Boolean
                | TypeKind::Int
                | TypeKind::Float
                | TypeKind::File
                | TypeKind::Directory,
                TypeKind::String,
            ) => true,
            (TypeKind::Array { item: a, .. }, TypeKind::Array { item: b, .. }) => {
                a.coerces(b, check_quant)
            }
            (TypeKind::Map { key: k1, value: v1 }, TypeKind::Map { key: k2, value: v2 }) => {
                k1.coerces(k2, check_quant) && v1.coerces(v2, check_quant)
            }
            (TypeKind::Pair { left: l1, right: r1 }, TypeKind::Pair { left: l2, right: r2 }) => {
                l1.coerces(l2, check_quant) && r1.coerces(r2, check_quant)
            }
            (TypeKind::Struct { name: a, .. }, TypeKind::Struct { name: b, .. }) => a == b,
            (a, b) => a == b,
        };
        if shape {
            return true;
        }
        match &target.kind {
            TypeKind::Array { item, .. } if !check_quant => self.coerces(item, check_quant),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Boolean => write!(f, "Boolean")?,
            TypeKind::Int => write!(f, "Int")?,
            TypeKind::Float => write!(f, "Float")?,
            TypeKind::String => write!(f, "String")?,
            TypeKind::File => write!(f, "File")?,
            TypeKind::Directory => write!(f, "Directory")?,
            TypeKind::Any => write!(f, "Any")?,
            TypeKind::Array { item, nonempty } => {
                write!(f, "Array[{}]", item)?;
                if *nonempty {
                    write!(f, "+")?;
                }
            }
            TypeKind::Map { key, value } => write!(f, "Map[{},{}]", key, value)?,
            TypeKind::Pair { left, right } => write!(f, "Pair[{},{}]", left, right)?,
            TypeKind::Struct { name, .. } => write!(f, "{}", name)?,
        }
        if self.optional {
            write!(f, "?")?;
        }
        Ok(())
    }
}

impl From<Type> for String {
    fn from(ty: Type) -> String {
        ty.to_string()
    }
}

impl TryFrom<String> for Type {
    type Error = TypeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Type {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser { text: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing text"));
        }
        Ok(ty)
    }
}

struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
}

impl TypeParser<'_> {
    fn error(&self, reason: &str) -> TypeParseError {
        TypeParseError {
            text: self.text.to_string(),
            reason: format!("{} at offset {}", reason, self.pos),
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), TypeParseError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{}`", c)))
        }
    }

    fn ident(&mut self) -> Result<&str, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected type name"));
        }
        Ok(&self.text[start..self.pos])
    }

    fn parse_type(&mut self) -> Result<Type, TypeParseError> {
        let name = self.ident()?.to_string();
        let mut ty = match name.as_str() {
            "Boolean" => Type::boolean(),
            "Int" => Type::int(),
            "Float" => Type::float(),
            "String" => Type::string(),
            "File" => Type::file(),
            "Directory" => Type::directory(),
            "Any" => Type::any(),
            "Array" => {
                self.expect('[')?;
                let item = self.parse_type()?;
                self.expect(']')?;
                let nonempty = self.eat('+');
                Type::array(item, nonempty)
            }
            "Map" | "Pair" => {
                self.expect('[')?;
                let first = self.parse_type()?;
                self.expect(',')?;
                let second = self.parse_type()?;
                self.expect(']')?;
                if name == "Map" {
                    Type::map(first, second)
                } else {
                    Type::pair(first, second)
                }
            }
            _ => Type::structure(name, Vec::new()),
        };
        ty.optional = self.eat('?');
        Ok(ty)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
