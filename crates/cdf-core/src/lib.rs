//! # CDF Core
//!
//! A fail-fast parser for CDF, a tag-based document markup language.
//!
//! Every construct is a `[[...]]` tag: block tags structure the document,
//! inline tags format prose, and `[[/]]` closes whatever is open.
//!
//! ## Quick Start
//!
//! ```rust
//! use cdf_core::{Block, Inline, Parser};
//!
//! let input = "[[cdf title=Hello]][[p]]Some [[b]]bold[[/]] text.[[/]][[/]]";
//! let doc = Parser::new().parse(input).unwrap();
//!
//! assert_eq!(doc.title.as_deref(), Some("Hello"));
//! assert!(matches!(&doc.content[0], Block::Paragraph(p) if p.content.len() == 3));
//! ```
//!
//! ## Escaping
//!
//! A backslash makes the next character literal, in prose and in attribute
//! values alike:
//!
//! ```rust
//! use cdf_core::{Block, Inline, Parser};
//!
//! let doc = Parser::new().parse(r"[[cdf]][[p]]a\[[b[[/]][[/]]").unwrap();
//! let Block::Paragraph(p) = &doc.content[0] else { unreachable!() };
//! assert!(matches!(&p.content[0], Inline::Text(t) if t.content == "a[[b"));
//! ```
//!
//! ## Errors
//!
//! The first error aborts the parse. It carries a [`ParseErrorKind`] and the
//! byte span where it was detected:
//!
//! ```rust
//! use cdf_core::{ParseErrorKind, Parser};
//!
//! let err = Parser::new().parse("[[cdf]][[h c=9]]Title[[/]][[/]]").unwrap_err();
//! assert_eq!(err.kind, ParseErrorKind::InvalidHeadingClass);
//! ```

pub mod ast;
pub mod attribute;
pub mod color;
pub mod cursor;
pub mod error;
pub mod escape;
pub mod html;
pub mod inline;
pub mod parser;
pub mod span;
pub mod tag;

pub use ast::{Block, Document, Inline};
pub use error::{ParseError, ParseErrorKind, Result};
pub use html::{to_html, HtmlExporter, HtmlSettings};
pub use parser::Parser;
