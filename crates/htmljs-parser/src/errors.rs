/// Machine-readable error codes reported through the `on_error` event.
///
/// The parser is single-shot: the first error latches the parser and no
/// further events are produced other than `on_finish`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedOpenTag,
    InvalidExpression,
    IllegalAttributeArgument,
    IllegalAttributeValue,
    BadIndentation,
    InvalidBody,
    IllegalLineStart,
    InvalidCharacter,
    MalformedPlaceholder,
    MalformedCdata,
    MalformedComment,
    MalformedDocumentType,
    MalformedDeclaration,
    MalformedScriptlet,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.into())
    }
}

impl From<ErrorCode> for &'static str {
    fn from(val: ErrorCode) -> Self {
        match val {
            ErrorCode::MalformedOpenTag => "MALFORMED_OPEN_TAG",
            ErrorCode::InvalidExpression => "INVALID_EXPRESSION",
            ErrorCode::IllegalAttributeArgument => "ILLEGAL_ATTRIBUTE_ARGUMENT",
            ErrorCode::IllegalAttributeValue => "ILLEGAL_ATTRIBUTE_VALUE",
            ErrorCode::BadIndentation => "BAD_INDENTATION",
            ErrorCode::InvalidBody => "INVALID_BODY",
            ErrorCode::IllegalLineStart => "ILLEGAL_LINE_START",
            ErrorCode::InvalidCharacter => "INVALID_CHARACTER",
            ErrorCode::MalformedPlaceholder => "MALFORMED_PLACEHOLDER",
            ErrorCode::MalformedCdata => "MALFORMED_CDATA",
            ErrorCode::MalformedComment => "MALFORMED_COMMENT",
            ErrorCode::MalformedDocumentType => "MALFORMED_DOCUMENT_TYPE",
            ErrorCode::MalformedDeclaration => "MALFORMED_DECLARATION",
            ErrorCode::MalformedScriptlet => "MALFORMED_SCRIPTLET",
        }
    }
}

impl From<&ErrorCode> for &'static str {
    fn from(val: &ErrorCode) -> Self {
        Into::<&'static str>::into(*val)
    }
}
