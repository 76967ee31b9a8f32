//! SyntaxKind - all token and node kinds in the Java CST.
//!
//! Token kinds occupy the low values (everything below `FIRST_NODE_KIND`)
//! so that token-kind sets fit in a 128-bit mask. A kind is just a tag: the
//! same value may tag a leaf before expansion and a composite after (doc
//! comments do this).

/// The kind of a token or tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown = 0,
    Eof = 1,

    // Trivia
    Whitespace = 2,
    LineComment = 3,
    BlockComment = 4,
    /// `/** ... */`. Tags the raw token and, once expanded by the doc
    /// grammar, the parsed composite.
    DocComment = 5,

    Identifier = 6,

    // Literals
    IntLiteral = 7,
    LongLiteral = 8,
    FloatLiteral = 9,
    DoubleLiteral = 10,
    CharLiteral = 11,
    StringLiteral = 12,

    // Separators
    LParen = 13,
    RParen = 14,
    LBrace = 15,
    RBrace = 16,
    LBracket = 17,
    RBracket = 18,
    Semicolon = 19,
    Comma = 20,
    Dot = 21,
    Ellipsis = 22,
    At = 23,

    // Operators. The lexer never emits a multi-`>` operator: `>` is always
    // a single token and a following `=` its own token; the `>`-family
    // compositions below only come to exist through the parser.
    Eq = 24,
    Gt = 25,
    Lt = 26,
    Bang = 27,
    Tilde = 28,
    Question = 29,
    Colon = 30,
    EqEq = 31,
    LtEq = 32,
    BangEq = 33,
    AndAnd = 34,
    OrOr = 35,
    PlusPlus = 36,
    MinusMinus = 37,
    Plus = 38,
    Minus = 39,
    Star = 40,
    Slash = 41,
    And = 42,
    Or = 43,
    Caret = 44,
    Percent = 45,
    Shl = 46,
    PlusEq = 47,
    MinusEq = 48,
    StarEq = 49,
    SlashEq = 50,
    AndEq = 51,
    OrEq = 52,
    CaretEq = 53,
    PercentEq = 54,
    ShlEq = 55,

    // Composed by the parser from adjacent `>` / `=` tokens.
    GtEq = 56,
    Shr = 57,
    Ushr = 58,
    ShrEq = 59,
    UshrEq = 60,

    // Keywords
    AbstractKeyword = 61,
    AssertKeyword = 62,
    BooleanKeyword = 63,
    BreakKeyword = 64,
    ByteKeyword = 65,
    CaseKeyword = 66,
    CatchKeyword = 67,
    CharKeyword = 68,
    ClassKeyword = 69,
    ConstKeyword = 70,
    ContinueKeyword = 71,
    DefaultKeyword = 72,
    DoKeyword = 73,
    DoubleKeyword = 74,
    ElseKeyword = 75,
    EnumKeyword = 76,
    ExtendsKeyword = 77,
    FinalKeyword = 78,
    FinallyKeyword = 79,
    FloatKeyword = 80,
    ForKeyword = 81,
    GotoKeyword = 82,
    IfKeyword = 83,
    ImplementsKeyword = 84,
    ImportKeyword = 85,
    InstanceofKeyword = 86,
    IntKeyword = 87,
    InterfaceKeyword = 88,
    LongKeyword = 89,
    NativeKeyword = 90,
    NewKeyword = 91,
    PackageKeyword = 92,
    PrivateKeyword = 93,
    ProtectedKeyword = 94,
    PublicKeyword = 95,
    ReturnKeyword = 96,
    ShortKeyword = 97,
    StaticKeyword = 98,
    StrictfpKeyword = 99,
    SuperKeyword = 100,
    SwitchKeyword = 101,
    SynchronizedKeyword = 102,
    ThisKeyword = 103,
    ThrowKeyword = 104,
    ThrowsKeyword = 105,
    TransientKeyword = 106,
    TryKeyword = 107,
    VoidKeyword = 108,
    VolatileKeyword = 109,
    WhileKeyword = 110,
    TrueKeyword = 111,
    FalseKeyword = 112,
    NullKeyword = 113,

    // Doc-comment tokens (produced by the doc sub-lexer)
    DocCommentStart = 114,
    DocCommentEnd = 115,
    DocCommentData = 116,
    DocSpace = 117,
    DocAsterisks = 118,
    DocTagName = 119,
    DocInlineTagStart = 120,
    DocInlineTagEnd = 121,

    /// Payload leaf of a lazily parsed block: the raw, unparsed text span.
    UnparsedText = 122,

    // ========================================================================
    // Node kinds
    // ========================================================================
    JavaFile = 128,
    PackageStatement = 129,
    ImportList = 130,
    ImportStatement = 131,
    /// Any of class / interface / enum / `@interface`; the keyword child
    /// distinguishes them.
    Class = 132,
    AnonymousClass = 133,
    TypeParameterList = 134,
    TypeParameter = 135,
    ExtendsList = 136,
    ImplementsList = 137,
    ThrowsList = 138,
    Field = 139,
    Method = 140,
    Parameter = 141,
    ParameterList = 142,
    LocalVariable = 143,
    ModifierList = 144,
    Annotation = 145,
    AnnotationParameterList = 146,
    NameValuePair = 147,
    ClassInitializer = 148,
    EnumConstant = 149,
    TypeArgumentList = 150,
    Type = 151,
    WildcardType = 152,
    JavaCodeReference = 153,

    // Expressions
    LiteralExpr = 154,
    ReferenceExpr = 155,
    ThisExpr = 156,
    SuperExpr = 157,
    ParenExpr = 158,
    BinaryExpr = 159,
    PrefixExpr = 160,
    PostfixExpr = 161,
    CastExpr = 162,
    ConditionalExpr = 163,
    AssignmentExpr = 164,
    InstanceofExpr = 165,
    MethodCallExpr = 166,
    ArgumentList = 167,
    ArrayAccessExpr = 168,
    NewExpr = 169,
    ArrayInitializer = 170,
    ClassLiteralExpr = 171,
    ExpressionList = 172,

    // Statements
    CodeBlock = 173,
    EmptyStatement = 174,
    ExpressionStatement = 175,
    ExpressionListStatement = 176,
    DeclarationStatement = 177,
    IfStatement = 178,
    WhileStatement = 179,
    DoWhileStatement = 180,
    ForStatement = 181,
    ForeachStatement = 182,
    SwitchStatement = 183,
    SwitchLabel = 184,
    BreakStatement = 185,
    ContinueStatement = 186,
    ReturnStatement = 187,
    ThrowStatement = 188,
    SynchronizedStatement = 189,
    TryStatement = 190,
    CatchClause = 191,
    AssertStatement = 192,
    LabeledStatement = 193,

    // Doc-comment composites
    DocTag = 194,
    DocInlineTag = 195,
    DocParameterRef = 196,

    /// Root of a fragment parse (class-body or annotation-body context),
    /// holding a member sequence with no surrounding header.
    Fragment = 197,

    /// Reserved kind for syntax-error composites.
    Error = 199,
}

impl SyntaxKind {
    pub const FIRST_NODE_KIND: u16 = 128;

    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) < Self::FIRST_NODE_KIND
    }

    /// Whitespace and comments, hidden from the grammar layer.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::DocComment
        )
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::LineComment | SyntaxKind::BlockComment | SyntaxKind::DocComment
        )
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        let v = self as u16;
        (SyntaxKind::AbstractKeyword as u16..=SyntaxKind::NullKeyword as u16).contains(&v)
    }

    #[inline]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::FinalKeyword
                | SyntaxKind::NativeKeyword
                | SyntaxKind::SynchronizedKeyword
                | SyntaxKind::TransientKeyword
                | SyntaxKind::VolatileKeyword
                | SyntaxKind::StrictfpKeyword
        )
    }

    /// Primitive type keywords, `void` included.
    #[inline]
    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::BooleanKeyword
                | SyntaxKind::ByteKeyword
                | SyntaxKind::CharKeyword
                | SyntaxKind::ShortKeyword
                | SyntaxKind::IntKeyword
                | SyntaxKind::LongKeyword
                | SyntaxKind::FloatKeyword
                | SyntaxKind::DoubleKeyword
                | SyntaxKind::VoidKeyword
        )
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntLiteral
                | SyntaxKind::LongLiteral
                | SyntaxKind::FloatLiteral
                | SyntaxKind::DoubleLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NullKeyword
        )
    }

    #[inline]
    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            SyntaxKind::Eq
                | SyntaxKind::PlusEq
                | SyntaxKind::MinusEq
                | SyntaxKind::StarEq
                | SyntaxKind::SlashEq
                | SyntaxKind::PercentEq
                | SyntaxKind::AndEq
                | SyntaxKind::OrEq
                | SyntaxKind::CaretEq
                | SyntaxKind::ShlEq
                | SyntaxKind::ShrEq
                | SyntaxKind::UshrEq
        )
    }

    /// Statement node kinds.
    #[inline]
    pub fn is_statement(self) -> bool {
        let v = self as u16;
        (SyntaxKind::CodeBlock as u16..=SyntaxKind::LabeledStatement as u16).contains(&v)
    }

    /// Declaration node kinds that comments bind to.
    #[inline]
    pub fn is_member_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::Class
                | SyntaxKind::Method
                | SyntaxKind::Field
                | SyntaxKind::EnumConstant
                | SyntaxKind::ClassInitializer
        )
    }

    /// The keyword kind for an identifier text, if it is a Java keyword.
    pub fn keyword_from_text(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        Some(match text {
            "abstract" => AbstractKeyword,
            "assert" => AssertKeyword,
            "boolean" => BooleanKeyword,
            "break" => BreakKeyword,
            "byte" => ByteKeyword,
            "case" => CaseKeyword,
            "catch" => CatchKeyword,
            "char" => CharKeyword,
            "class" => ClassKeyword,
            "const" => ConstKeyword,
            "continue" => ContinueKeyword,
            "default" => DefaultKeyword,
            "do" => DoKeyword,
            "double" => DoubleKeyword,
            "else" => ElseKeyword,
            "enum" => EnumKeyword,
            "extends" => ExtendsKeyword,
            "final" => FinalKeyword,
            "finally" => FinallyKeyword,
            "float" => FloatKeyword,
            "for" => ForKeyword,
            "goto" => GotoKeyword,
            "if" => IfKeyword,
            "implements" => ImplementsKeyword,
            "import" => ImportKeyword,
            "instanceof" => InstanceofKeyword,
            "int" => IntKeyword,
            "interface" => InterfaceKeyword,
            "long" => LongKeyword,
            "native" => NativeKeyword,
            "new" => NewKeyword,
            "package" => PackageKeyword,
            "private" => PrivateKeyword,
            "protected" => ProtectedKeyword,
            "public" => PublicKeyword,
            "return" => ReturnKeyword,
            "short" => ShortKeyword,
            "static" => StaticKeyword,
            "strictfp" => StrictfpKeyword,
            "super" => SuperKeyword,
            "switch" => SwitchKeyword,
            "synchronized" => SynchronizedKeyword,
            "this" => ThisKeyword,
            "throw" => ThrowKeyword,
            "throws" => ThrowsKeyword,
            "transient" => TransientKeyword,
            "try" => TryKeyword,
            "void" => VoidKeyword,
            "volatile" => VolatileKeyword,
            "while" => WhileKeyword,
            "true" => TrueKeyword,
            "false" => FalseKeyword,
            "null" => NullKeyword,
            _ => return None,
        })
    }
}
