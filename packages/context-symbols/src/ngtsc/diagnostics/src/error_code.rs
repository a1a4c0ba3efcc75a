use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    DecoratorArgNotLiteral = 1001,
    DecoratorArityWrong = 1002,
    DecoratorNotCalled = 1003,

    /// This error code indicates that there are incompatible decorators on a type.
    DecoratorCollision = 1006,

    ValueHasWrongType = 1010,

    /// A metadata value could not be statically evaluated.
    ValueNotLiteral = 1011,

    ComponentMissingTemplate = 2001,
    PipeMissingName = 2002,
    DirectiveMissingSelector = 2004,

    /// Raised when an component cannot resolve an external resource, such as a template or a style
    /// sheet.
    ComponentResourceNotFound = 2008,

    /// A provider object names none of `useValue`, `useClass`, `useExisting`, `useFactory`.
    ProviderMissingStrategy = 2030,

    /// A provider object names more than one strategy; the first one is used.
    ProviderStrategyConflict = 2031,

    /// `ANALYZE_FOR_ENTRY_COMPONENTS` provided without `multi: true` or with a non-array value.
    InvalidEntryComponentsProvider = 2032,

    NgmoduleInvalidDeclaration = 6001,
    NgmoduleInvalidImport = 6002,
    NgmoduleInvalidExport = 6003,
    NgmoduleInvalidReexport = 6004,
    NgmoduleInvalidLazyRoute = 6010,

    RootModuleNotFound = 7001,
    RootModuleAmbiguous = 7002,
    DeclarationNotFound = 7003,
}

impl ErrorCode {
    pub fn value(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NG{}", self.value())
    }
}

/// Angular error codes are reported with a `-99` prefix so formatted
/// diagnostics can tell them apart from TypeScript's own (`-99` + `1001` -> `-991001`).
pub fn ng_error_code(code: ErrorCode) -> i32 {
    -(990_000 + code.value())
}
