// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    SourceNotFound,
    TargetNotFound,
    NodeNotFound,
    EdgeNotFound,
    CircularDependency,
    MissingLocationParameter,
    UnknownParameter,
    ParameterOutOfRange,
    InvalidDistribution,
    BadGraphFile,
    DuplicateNodeKey,
    UnknownNodeKey,
    EmptySamples,
    RenderFailed,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            SourceNotFound => "source_not_found",
            TargetNotFound => "target_not_found",
            NodeNotFound => "node_not_found",
            EdgeNotFound => "edge_not_found",
            CircularDependency => "circular_dependency",
            MissingLocationParameter => "missing_location_parameter",
            UnknownParameter => "unknown_parameter",
            ParameterOutOfRange => "parameter_out_of_range",
            InvalidDistribution => "invalid_distribution",
            BadGraphFile => "bad_graph_file",
            DuplicateNodeKey => "duplicate_node_key",
            UnknownNodeKey => "unknown_node_key",
            EmptySamples => "empty_samples",
            RenderFailed => "render_failed",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Graph,
    Sampling,
    Layout,
    Import,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Graph => "GraphError",
            ErrorKind::Sampling => "SamplingError",
            ErrorKind::Layout => "LayoutError",
            ErrorKind::Import => "ImportError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Import, ErrorCode::BadGraphFile, Some(err.to_string()))
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! graph_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Graph,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! sampling_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Sampling,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[macro_export]
macro_rules! import_err(
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Import,
            ErrorCode::$code,
            Some($str),
        ))
    }}
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::new(
            ErrorKind::Graph,
            ErrorCode::SourceNotFound,
            Some("node 7".to_owned()),
        );
        assert_eq!(err.to_string(), "GraphError{source_not_found: node 7}");

        let err = Error::new(ErrorKind::Sampling, ErrorCode::CircularDependency, None);
        assert_eq!(err.to_string(), "SamplingError{circular_dependency}");
    }

    #[test]
    fn test_error_macros() {
        let result: Result<()> = graph_err!(TargetNotFound, "missing".to_owned());
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Graph);
        assert_eq!(err.code, ErrorCode::TargetNotFound);
        assert_eq!(err.get_details().as_deref(), Some("missing"));

        let result: Result<()> = sampling_err!(UnknownParameter, "zeta".to_owned());
        assert_eq!(result.unwrap_err().kind, ErrorKind::Sampling);
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: Error = parse.unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::Import);
        assert_eq!(err.code, ErrorCode::BadGraphFile);
    }
}
