//! Typed syntax model for Go packages.
//!
//! These types mirror the JSON schema written by the Go frontend
//! (`go/packages` + `go/types`) and are the only input the analyzer reads.
//! Syntax nodes carry a package-unique [`NodeId`]; all type information is
//! kept in side tables keyed by that id, like `types.Info` on the Go side.

use serde::{Deserialize, Serialize};

/// Package-unique id of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Package-unique id of an entry in the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

/// Package-unique id of a resolved declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

/// Root type: complete analysis input from the Go frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub packages: Vec<Package>,
    pub go_version: String,
    #[serde(default)]
    pub bridge_version: String,
}

/// A type-checked Go package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub import_path: String,
    pub name: String,
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub info: TypeInfoData,
}

/// A source file and the root expressions of its statements, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    #[serde(default)]
    pub is_generated: bool,
    #[serde(default)]
    pub is_test: bool,
    #[serde(default)]
    pub exprs: Vec<Expr>,
}

/// Source location span
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    pub file: String,
    pub start_line: u32,
    pub start_col: u32,
    #[serde(default)]
    pub end_line: u32,
    #[serde(default)]
    pub end_col: u32,
}

impl Span {
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
        }
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub id: NodeId,
    #[serde(default)]
    pub span: Option<Span>,
    #[serde(flatten)]
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    /// Identifier: `err`, `new`, `nil`
    Ident { name: String },
    /// Basic literal with its source text: `42`, `"hello"`
    BasicLit { lit: LitKind, value: String },
    /// Composite literal: `T{...}`; `ty` is absent for elided inner literals.
    CompositeLit {
        #[serde(default)]
        ty: Option<Box<Expr>>,
        #[serde(default)]
        elts: Vec<Expr>,
    },
    /// `key: value` inside a composite literal
    KeyValue { key: Box<Expr>, value: Box<Expr> },
    /// `(x)`
    Paren { x: Box<Expr> },
    /// `x.sel`; `sel` is always an `Ident`.
    Selector { x: Box<Expr>, sel: Box<Expr> },
    /// `x[i]` or generic instantiation `F[T1, T2]`
    Index { x: Box<Expr>, indices: Vec<Expr> },
    /// `x[lo:hi]` or `x[lo:hi:max]`
    Slice {
        x: Box<Expr>,
        #[serde(default)]
        low: Option<Box<Expr>>,
        #[serde(default)]
        high: Option<Box<Expr>>,
        #[serde(default)]
        max: Option<Box<Expr>>,
        #[serde(default)]
        slice3: bool,
    },
    /// `x.(T)`, or `x.(type)` in a type switch when `ty` is absent
    TypeAssert {
        x: Box<Expr>,
        #[serde(default)]
        ty: Option<Box<Expr>>,
    },
    /// `*x` (dereference or pointer type)
    Star { x: Box<Expr> },
    /// `&x`, `-x`, `!x`, `<-x`, ...
    Unary { op: UnaryOp, x: Box<Expr> },
    /// `x op y`
    Binary {
        op: BinaryOp,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    /// `fun(args...)`
    Call {
        fun: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        ellipsis: bool,
    },
    /// Function literal; `body` holds the root expressions of its statements.
    FuncLit {
        ty: Box<Expr>,
        #[serde(default)]
        body: Vec<Expr>,
    },
    /// `[N]T`, `[...]T`, or `[]T` when `len` is absent
    ArrayType {
        #[serde(default)]
        len: Option<Box<Expr>>,
        elem: Box<Expr>,
    },
    /// `map[K]V`
    MapType { key: Box<Expr>, value: Box<Expr> },
    /// `chan T`, `chan<- T`, `<-chan T`
    ChanType { dir: ChanDir, value: Box<Expr> },
    /// `func(params) results`
    FuncType {
        #[serde(default)]
        params: Vec<FieldExpr>,
        #[serde(default)]
        results: Vec<FieldExpr>,
    },
    /// `struct{...}`
    StructType {
        #[serde(default)]
        fields: Vec<FieldExpr>,
    },
    /// `interface{...}`
    InterfaceType {
        #[serde(default)]
        methods: Vec<FieldExpr>,
    },
    /// `...T` in a variadic parameter list or `[...]T` array length
    Ellipsis {
        #[serde(default)]
        elt: Option<Box<Expr>>,
    },
    /// Syntax error placeholder; cannot be rendered.
    Bad,
}

/// A field, parameter, or interface method in a type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExpr {
    #[serde(default)]
    pub names: Vec<String>,
    pub ty: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "&")]
    And,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "^")]
    Xor,
    #[serde(rename = "<-")]
    Arrow,
    #[serde(rename = "~")]
    Tilde,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "&",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Not => "!",
            Self::Xor => "^",
            Self::Arrow => "<-",
            Self::Tilde => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Quo,
    #[serde(rename = "%")]
    Rem,
    #[serde(rename = "&")]
    And,
    #[serde(rename = "|")]
    Or,
    #[serde(rename = "^")]
    Xor,
    #[serde(rename = "<<")]
    Shl,
    #[serde(rename = ">>")]
    Shr,
    #[serde(rename = "&^")]
    AndNot,
    #[serde(rename = "&&")]
    LAnd,
    #[serde(rename = "||")]
    LOr,
    #[serde(rename = "==")]
    Eql,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = "<")]
    Lss,
    #[serde(rename = ">")]
    Gtr,
    #[serde(rename = "<=")]
    Leq,
    #[serde(rename = ">=")]
    Geq,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Quo => "/",
            Self::Rem => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::AndNot => "&^",
            Self::LAnd => "&&",
            Self::LOr => "||",
            Self::Eql => "==",
            Self::Neq => "!=",
            Self::Lss => "<",
            Self::Gtr => ">",
            Self::Leq => "<=",
            Self::Geq => ">=",
        }
    }

    /// `==` or `!=`.
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eql | Self::Neq)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

impl Expr {
    /// Strip any number of surrounding parentheses.
    pub fn unparen(&self) -> &Expr {
        let mut e = self;
        while let ExprKind::Paren { x } = &e.kind {
            e = x;
        }
        e
    }

    /// The identifier name, if this is an `Ident`.
    pub fn ident_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Expr> {
        let mut out: Vec<&Expr> = Vec::new();
        match &self.kind {
            ExprKind::Ident { .. } | ExprKind::BasicLit { .. } | ExprKind::Bad => {}
            ExprKind::CompositeLit { ty, elts } => {
                out.extend(ty.as_deref());
                out.extend(elts.iter());
            }
            ExprKind::KeyValue { key, value } => {
                out.push(key);
                out.push(value);
            }
            ExprKind::Paren { x }
            | ExprKind::Star { x }
            | ExprKind::Unary { x, .. } => out.push(x),
            ExprKind::Selector { x, sel } => {
                out.push(x);
                out.push(sel);
            }
            ExprKind::Index { x, indices } => {
                out.push(x);
                out.extend(indices.iter());
            }
            ExprKind::Slice {
                x, low, high, max, ..
            } => {
                out.push(x);
                out.extend(low.as_deref());
                out.extend(high.as_deref());
                out.extend(max.as_deref());
            }
            ExprKind::TypeAssert { x, ty } => {
                out.push(x);
                out.extend(ty.as_deref());
            }
            ExprKind::Binary { x, y, .. } => {
                out.push(x);
                out.push(y);
            }
            ExprKind::Call { fun, args, .. } => {
                out.push(fun);
                out.extend(args.iter());
            }
            ExprKind::FuncLit { ty, body } => {
                out.push(ty);
                out.extend(body.iter());
            }
            ExprKind::ArrayType { len, elem } => {
                out.extend(len.as_deref());
                out.push(elem);
            }
            ExprKind::MapType { key, value } => {
                out.push(key);
                out.push(value);
            }
            ExprKind::ChanType { value, .. } => out.push(value),
            ExprKind::FuncType { params, results } => {
                out.extend(params.iter().map(|f| &f.ty));
                out.extend(results.iter().map(|f| &f.ty));
            }
            ExprKind::StructType { fields } => out.extend(fields.iter().map(|f| &f.ty)),
            ExprKind::InterfaceType { methods } => out.extend(methods.iter().map(|f| &f.ty)),
            ExprKind::Ellipsis { elt } => out.extend(elt.as_deref()),
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Type table
// ---------------------------------------------------------------------------

/// An entry in the package type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub id: TypeId,
    #[serde(flatten)]
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// Predeclared basic type: `bool`, `int`, `string`, `untyped nil`, ...
    Basic { name: String },
    /// Defined type. `methods` lists declared methods only; methods of
    /// interface types live on the underlying `Interface`.
    Named {
        name: String,
        /// Import path of the declaring package; absent for universe types (`error`).
        #[serde(default)]
        pkg: Option<String>,
        underlying: TypeId,
        #[serde(default)]
        methods: Vec<Method>,
        #[serde(default)]
        type_args: Vec<TypeId>,
    },
    Pointer { elem: TypeId },
    Slice { elem: TypeId },
    Array { len: u64, elem: TypeId },
    Map { key: TypeId, elem: TypeId },
    Chan { dir: ChanDir, elem: TypeId },
    Struct {
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// Interface with its complete method set (embedded interfaces flattened).
    Interface {
        #[serde(default)]
        methods: Vec<Method>,
    },
    Signature {
        #[serde(default)]
        params: Vec<TypeId>,
        #[serde(default)]
        results: Vec<TypeId>,
        #[serde(default)]
        variadic: bool,
    },
    Tuple { elems: Vec<TypeId> },
    TypeParam { name: String },
    #[serde(other)]
    Unknown,
}

/// A method; `sig` refers to a `Signature` without the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub sig: TypeId,
    #[serde(default)]
    pub pointer_receiver: bool,
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    pub ty: TypeId,
    #[serde(default)]
    pub embedded: bool,
}

// ---------------------------------------------------------------------------
// Objects and type-checker side tables
// ---------------------------------------------------------------------------

/// A resolved declaration (`types.Object`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    /// Import path of the declaring package; absent in the universe scope.
    #[serde(default)]
    pub pkg: Option<String>,
    pub kind: ObjectKind,
    /// Receiver base type name for methods (pointer stripped).
    #[serde(default)]
    pub recv: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Func,
    Builtin,
    Var,
    Const,
    TypeName,
    PkgName,
    Nil,
    Label,
    #[serde(other)]
    Unknown,
}

/// Raw type-checker records as written by the frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeInfoData {
    #[serde(default)]
    pub types: Vec<ExprType>,
    #[serde(default)]
    pub uses: Vec<Use>,
    #[serde(default)]
    pub selections: Vec<SelectionRecord>,
}

/// Type and addressing mode of an expression (`types.TypeAndValue`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprType {
    pub node: NodeId,
    #[serde(default)]
    pub ty: Option<TypeId>,
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Value,
    Variable,
    Constant,
    Builtin,
    TypeExpr,
    Nil,
    Void,
    CommaOk,
}

/// Identifier → declaration (`types.Info.Uses`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Use {
    pub node: NodeId,
    pub object: ObjectId,
}

/// Selector expression → selected field or method (`types.Info.Selections`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub node: NodeId,
    pub kind: SelectionKind,
    pub object: ObjectId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// `x.f` is a struct field.
    FieldVal,
    /// `x.m` is a bound method value.
    MethodVal,
    /// `T.m` is a method expression; the receiver becomes the first argument.
    MethodExpr,
}
