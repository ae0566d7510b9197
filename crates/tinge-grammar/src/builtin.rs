//! Built-in grammar tables for C and C++.

use std::sync::{Arc, OnceLock};

use crate::{BlockComment, Grammar, Language, WordList};

pub(crate) const C_OPERATORS: &[&str] = &[
    "...", "<<=", ">>=", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "##", "+", "-", "*", "/", "%", "=", "<", ">", "!",
    "~", "&", "|", "^", "?", ":", ".", "#",
];

const CPP_EXTRA_OPERATORS: &[&str] = &["::", "->*", ".*", "<=>"];

const ENCODING_PREFIXES: &[&str] = &["u8", "u", "U", "L"];

const C_CONTROL: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "goto",
];

const C_KEYWORDS: &[&str] = &[
    "auto", "const", "enum", "extern", "inline", "register", "restrict", "sizeof", "static",
    "struct", "typedef", "union", "volatile", "asm", "_Alignas", "_Alignof", "_Atomic",
    "_Generic", "_Noreturn", "_Static_assert", "_Thread_local", "_Pragma",
    // C23
    "alignas", "alignof", "constexpr", "static_assert", "thread_local", "typeof",
    "typeof_unqual",
];

const C_TYPES: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "bool", "_Complex", "_Imaginary", "_BitInt", "_Decimal32", "_Decimal64", "_Decimal128",
    "size_t", "ssize_t", "ptrdiff_t", "intptr_t", "uintptr_t", "intmax_t", "uintmax_t",
    "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t",
    "wchar_t", "char8_t", "char16_t", "char32_t", "nullptr_t", "va_list", "FILE", "DIR",
    "time_t", "clock_t", "pid_t", "off_t",
];

const CPP_CONTROL: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "goto", "try", "catch", "throw", "co_await", "co_return", "co_yield",
];

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "class", "compl",
    "concept", "const", "const_cast", "consteval", "constexpr", "constinit", "decltype",
    "delete", "dynamic_cast", "enum", "explicit", "export", "extern", "final", "friend",
    "import", "inline", "module", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "operator", "or", "or_eq", "override", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "sizeof", "static", "static_assert", "static_cast",
    "struct", "template", "this", "thread_local", "typedef", "typeid", "typename", "union",
    "using", "virtual", "volatile", "xor", "xor_eq",
];

const CPP_TYPES: &[&str] = &[
    "void", "bool", "char", "char8_t", "char16_t", "char32_t", "wchar_t", "short", "int",
    "long", "float", "double", "signed", "unsigned", "size_t", "ptrdiff_t", "nullptr_t",
    "intptr_t", "uintptr_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t",
    "uint32_t", "uint64_t",
    // Standard library
    "string", "string_view", "vector", "map", "unordered_map", "set", "unordered_set", "list",
    "deque", "queue", "priority_queue", "stack", "array", "pair", "tuple", "optional",
    "variant", "any", "function", "shared_ptr", "unique_ptr", "weak_ptr", "span", "ostream",
    "istream",
];

const BOOLEANS: &[&str] = &["true", "false", "TRUE", "FALSE"];

impl Grammar {
    /// The C grammar (C89 through C23).
    pub fn c() -> Self {
        Self {
            name: Language::C.id().to_string(),
            extensions: owned(Language::C.extensions()),
            keywords: WordList::from_static(C_KEYWORDS),
            control: WordList::from_static(C_CONTROL),
            types: WordList::from_static(C_TYPES),
            constants: WordList::from_static(BOOLEANS),
            null_literals: WordList::from_static(&["NULL", "nullptr"]),
            line_comment: Some("//".to_string()),
            block_comment: Some(BlockComment::new("/*", "*/")),
            operators: owned(C_OPERATORS),
            string_prefixes: owned(ENCODING_PREFIXES),
            preprocessor: true,
            raw_strings: false,
            // C23 allows ' as a digit separator
            digit_separators: true,
        }
    }

    /// The C++ grammar (through C++23).
    pub fn cpp() -> Self {
        let mut operators = owned(C_OPERATORS);
        operators.extend(owned(CPP_EXTRA_OPERATORS));

        Self {
            name: Language::Cpp.id().to_string(),
            extensions: owned(Language::Cpp.extensions()),
            keywords: WordList::from_static(CPP_KEYWORDS),
            control: WordList::from_static(CPP_CONTROL),
            types: WordList::from_static(CPP_TYPES),
            constants: WordList::from_static(BOOLEANS),
            null_literals: WordList::from_static(&["nullptr", "NULL"]),
            line_comment: Some("//".to_string()),
            block_comment: Some(BlockComment::new("/*", "*/")),
            operators,
            string_prefixes: owned(ENCODING_PREFIXES),
            preprocessor: true,
            raw_strings: true,
            digit_separators: true,
        }
    }

    /// Shared built-in grammar for a language; `None` for plain text.
    pub fn builtin(language: Language) -> Option<Arc<Grammar>> {
        static C: OnceLock<Arc<Grammar>> = OnceLock::new();
        static CPP: OnceLock<Arc<Grammar>> = OnceLock::new();

        match language {
            Language::C => Some(Arc::clone(C.get_or_init(|| Arc::new(Grammar::c())))),
            Language::Cpp => Some(Arc::clone(CPP.get_or_init(|| Arc::new(Grammar::cpp())))),
            Language::PlainText => None,
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}
