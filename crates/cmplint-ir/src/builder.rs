//! Programmatic construction of type-checked packages for tests.
//!
//! Every expression helper allocates fresh node ids and records the type
//! and use information the Go type checker would have produced for it.

use crate::ir::*;
use std::collections::HashMap;

/// Builds a [`Package`] one statement at a time.
pub struct PackageBuilder {
    import_path: String,
    name: String,
    next_node: u32,
    next_object: u32,
    types: Vec<TypeDef>,
    objects: Vec<Object>,
    info: TypeInfoData,
    files: Vec<SourceFile>,
    current: SourceFile,
    line: u32,
    funcs: HashMap<(String, Option<String>, String), ObjectId>,
    universe: Universe,
}

#[derive(Debug, Clone, Copy)]
struct Universe {
    bool_ty: TypeId,
    string_ty: TypeId,
    int_ty: TypeId,
    error_ty: TypeId,
    nil_ty: TypeId,
    new_obj: ObjectId,
    nil_obj: ObjectId,
}

impl PackageBuilder {
    pub fn new(import_path: &str) -> Self {
        let name = import_path.rsplit('/').next().unwrap_or(import_path).to_string();
        let mut b = Self {
            import_path: import_path.to_string(),
            current: SourceFile {
                path: format!("{name}.go"),
                is_generated: false,
                is_test: false,
                exprs: vec![],
            },
            name,
            next_node: 1,
            next_object: 1,
            types: vec![],
            objects: vec![],
            info: TypeInfoData::default(),
            files: vec![],
            line: 0,
            funcs: HashMap::new(),
            universe: Universe {
                bool_ty: TypeId(0),
                string_ty: TypeId(0),
                int_ty: TypeId(0),
                error_ty: TypeId(0),
                nil_ty: TypeId(0),
                new_obj: ObjectId(0),
                nil_obj: ObjectId(0),
            },
        };

        let bool_ty = b.basic("bool");
        let string_ty = b.basic("string");
        let int_ty = b.basic("int");
        let nil_ty = b.basic("untyped nil");
        let error_sig = b.signature(vec![], vec![string_ty]);
        let error_iface = b.add_type(TypeKind::Interface {
            methods: vec![Method {
                name: "Error".into(),
                sig: error_sig,
                pointer_receiver: false,
            }],
        });
        let error_ty = b.add_type(TypeKind::Named {
            name: "error".into(),
            pkg: None,
            underlying: error_iface,
            methods: vec![],
            type_args: vec![],
        });
        let new_obj = b.add_object("new", None, ObjectKind::Builtin, None);
        let nil_obj = b.add_object("nil", None, ObjectKind::Nil, None);

        b.universe = Universe {
            bool_ty,
            string_ty,
            int_ty,
            error_ty,
            nil_ty,
            new_obj,
            nil_obj,
        };
        b
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn bool_type(&self) -> TypeId {
        self.universe.bool_ty
    }

    pub fn string_type(&self) -> TypeId {
        self.universe.string_ty
    }

    pub fn int_type(&self) -> TypeId {
        self.universe.int_ty
    }

    pub fn error_type(&self) -> TypeId {
        self.universe.error_ty
    }

    // -- types ------------------------------------------------------------

    pub fn add_type(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32 + 1);
        self.types.push(TypeDef { id, kind });
        id
    }

    pub fn basic(&mut self, name: &str) -> TypeId {
        self.add_type(TypeKind::Basic { name: name.into() })
    }

    /// Defined type declared in this package.
    pub fn named(&mut self, name: &str, underlying: TypeId) -> TypeId {
        let pkg = self.import_path.clone();
        self.named_in(&pkg, name, underlying)
    }

    /// Defined type declared in package `pkg`.
    pub fn named_in(&mut self, pkg: &str, name: &str, underlying: TypeId) -> TypeId {
        self.add_type(TypeKind::Named {
            name: name.into(),
            pkg: Some(pkg.into()),
            underlying,
            methods: vec![],
            type_args: vec![],
        })
    }

    pub fn struct_type(&mut self, fields: Vec<Field>) -> TypeId {
        self.add_type(TypeKind::Struct { fields })
    }

    pub fn array(&mut self, len: u64, elem: TypeId) -> TypeId {
        self.add_type(TypeKind::Array { len, elem })
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.add_type(TypeKind::Pointer { elem })
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.add_type(TypeKind::Slice { elem })
    }

    pub fn tuple(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.add_type(TypeKind::Tuple { elems })
    }

    pub fn signature(&mut self, params: Vec<TypeId>, results: Vec<TypeId>) -> TypeId {
        self.add_type(TypeKind::Signature {
            params,
            results,
            variadic: false,
        })
    }

    pub fn interface(&mut self, methods: Vec<Method>) -> TypeId {
        self.add_type(TypeKind::Interface { methods })
    }

    /// Declare a pointer-receiver method on the defined type `on`.
    pub fn add_method(&mut self, on: TypeId, name: &str, params: Vec<TypeId>, results: Vec<TypeId>) {
        let sig = self.signature(params, results);
        if let Some(TypeDef {
            kind: TypeKind::Named { methods, .. },
            ..
        }) = self.types.iter_mut().find(|t| t.id == on)
        {
            methods.push(Method {
                name: name.into(),
                sig,
                pointer_receiver: true,
            });
        }
    }

    /// `func (*T) Is(error) bool`
    pub fn add_is_method(&mut self, on: TypeId) {
        let (e, b) = (self.error_type(), self.bool_type());
        self.add_method(on, "Is", vec![e], vec![b]);
    }

    /// `func (*T) Unwrap() error`
    pub fn add_unwrap_method(&mut self, on: TypeId) {
        let e = self.error_type();
        self.add_method(on, "Unwrap", vec![], vec![e]);
    }

    pub fn field(name: &str, ty: TypeId) -> Field {
        Field {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    /// Embedded field; named after the type like Go does.
    pub fn embed(&self, ty: TypeId) -> Field {
        let base = match self.type_kind(ty) {
            Some(TypeKind::Pointer { elem }) => *elem,
            _ => ty,
        };
        let name = match self.type_kind(base) {
            Some(TypeKind::Named { name, .. }) | Some(TypeKind::Basic { name }) => name.clone(),
            _ => String::new(),
        };
        Field {
            name,
            ty,
            embedded: true,
        }
    }

    fn type_kind(&self, ty: TypeId) -> Option<&TypeKind> {
        self.types.iter().find(|t| t.id == ty).map(|t| &t.kind)
    }

    // -- objects ----------------------------------------------------------

    fn add_object(
        &mut self,
        name: &str,
        pkg: Option<&str>,
        kind: ObjectKind,
        recv: Option<&str>,
    ) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.push(Object {
            id,
            name: name.into(),
            pkg: pkg.map(Into::into),
            kind,
            recv: recv.map(Into::into),
        });
        id
    }

    fn func_object(&mut self, path: &str, recv: Option<&str>, name: &str) -> ObjectId {
        let key = (path.to_string(), recv.map(Into::into), name.to_string());
        if let Some(id) = self.funcs.get(&key) {
            return *id;
        }
        let id = self.add_object(name, Some(path), ObjectKind::Func, recv);
        self.funcs.insert(key, id);
        id
    }

    // -- expressions ------------------------------------------------------

    fn node(&mut self, kind: ExprKind) -> Expr {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        Expr {
            id,
            span: None,
            kind,
        }
    }

    fn record(&mut self, node: NodeId, ty: Option<TypeId>, mode: Mode) {
        self.info.types.push(ExprType { node, ty, mode });
    }

    fn ident(&mut self, name: &str) -> Expr {
        self.node(ExprKind::Ident { name: name.into() })
    }

    /// A variable reference of type `ty`.
    pub fn var(&mut self, name: &str, ty: TypeId) -> Expr {
        let e = self.ident(name);
        let path = self.import_path.clone();
        let obj = self.add_object(name, Some(&path), ObjectKind::Var, None);
        self.info.uses.push(Use {
            node: e.id,
            object: obj,
        });
        self.record(e.id, Some(ty), Mode::Variable);
        e
    }

    /// The untyped `nil` value.
    pub fn nil(&mut self) -> Expr {
        let e = self.ident("nil");
        self.info.uses.push(Use {
            node: e.id,
            object: self.universe.nil_obj,
        });
        let nil_ty = self.universe.nil_ty;
        self.record(e.id, Some(nil_ty), Mode::Nil);
        e
    }

    pub fn int_lit(&mut self, value: i64) -> Expr {
        let e = self.node(ExprKind::BasicLit {
            lit: LitKind::Int,
            value: value.to_string(),
        });
        let int_ty = self.universe.int_ty;
        self.record(e.id, Some(int_ty), Mode::Constant);
        e
    }

    pub fn string_lit(&mut self, value: &str) -> Expr {
        let e = self.node(ExprKind::BasicLit {
            lit: LitKind::String,
            value: format!("{value:?}"),
        });
        let string_ty = self.universe.string_ty;
        self.record(e.id, Some(string_ty), Mode::Constant);
        e
    }

    /// Type expression naming `ty`, qualified when declared elsewhere.
    pub fn type_expr(&mut self, ty: TypeId) -> Expr {
        let e = match self.type_kind(ty).cloned() {
            Some(TypeKind::Named { name, pkg, .. }) => match pkg {
                Some(p) if p != self.import_path => {
                    let qual = p.rsplit('/').next().unwrap_or(&p).to_string();
                    let x = self.ident(&qual);
                    let sel = self.ident(&name);
                    self.node(ExprKind::Selector {
                        x: Box::new(x),
                        sel: Box::new(sel),
                    })
                }
                _ => self.ident(&name),
            },
            Some(TypeKind::Basic { name }) => self.ident(&name),
            Some(TypeKind::Array { len, elem }) => {
                let l = self.int_lit(len as i64);
                let el = self.type_expr(elem);
                self.node(ExprKind::ArrayType {
                    len: Some(Box::new(l)),
                    elem: Box::new(el),
                })
            }
            Some(TypeKind::Struct { fields }) if fields.is_empty() => {
                self.node(ExprKind::StructType { fields: vec![] })
            }
            _ => self.node(ExprKind::Bad),
        };
        self.record(e.id, Some(ty), Mode::TypeExpr);
        e
    }

    /// Composite literal `T{elts...}` of type `ty`.
    pub fn composite(&mut self, ty: TypeId, elts: Vec<Expr>) -> Expr {
        let t = self.type_expr(ty);
        let e = self.node(ExprKind::CompositeLit {
            ty: Some(Box::new(t)),
            elts,
        });
        self.record(e.id, Some(ty), Mode::Value);
        e
    }

    /// Composite literal without any recorded type information.
    pub fn untyped_composite(&mut self, type_name: &str) -> Expr {
        let t = self.ident(type_name);
        self.node(ExprKind::CompositeLit {
            ty: Some(Box::new(t)),
            elts: vec![],
        })
    }

    pub fn key_value(&mut self, key: &str, value: Expr) -> Expr {
        let k = self.ident(key);
        self.node(ExprKind::KeyValue {
            key: Box::new(k),
            value: Box::new(value),
        })
    }

    /// `&x`
    pub fn addr_of(&mut self, x: Expr) -> Expr {
        let elem = self
            .info
            .types
            .iter()
            .rev()
            .find(|t| t.node == x.id)
            .and_then(|t| t.ty);
        let e = self.node(ExprKind::Unary {
            op: UnaryOp::And,
            x: Box::new(x),
        });
        let ptr = elem.map(|t| self.pointer(t));
        self.record(e.id, ptr, Mode::Value);
        e
    }

    /// `&T{}`
    pub fn addr_of_composite(&mut self, ty: TypeId) -> Expr {
        let lit = self.composite(ty, vec![]);
        self.addr_of(lit)
    }

    /// `new(T)`
    pub fn new_call(&mut self, ty: TypeId) -> Expr {
        let fun = self.ident("new");
        self.info.uses.push(Use {
            node: fun.id,
            object: self.universe.new_obj,
        });
        self.record(fun.id, None, Mode::Builtin);
        let arg = self.type_expr(ty);
        let e = self.node(ExprKind::Call {
            fun: Box::new(fun),
            args: vec![arg],
            ellipsis: false,
        });
        let ptr = self.pointer(ty);
        self.record(e.id, Some(ptr), Mode::Value);
        e
    }

    /// `x op y`
    pub fn binary(&mut self, op: BinaryOp, x: Expr, y: Expr) -> Expr {
        let e = self.node(ExprKind::Binary {
            op,
            x: Box::new(x),
            y: Box::new(y),
        });
        let bool_ty = self.universe.bool_ty;
        self.record(e.id, Some(bool_ty), Mode::Value);
        e
    }

    pub fn eq(&mut self, x: Expr, y: Expr) -> Expr {
        self.binary(BinaryOp::Eql, x, y)
    }

    pub fn paren(&mut self, x: Expr) -> Expr {
        self.node(ExprKind::Paren { x: Box::new(x) })
    }

    /// Reference to function `name` of package `path`: a plain identifier
    /// inside the package, a qualified identifier `pkg.Name` elsewhere.
    pub fn func(&mut self, path: &str, name: &str) -> Expr {
        let obj = self.func_object(path, None, name);
        if path == self.import_path {
            let e = self.ident(name);
            self.info.uses.push(Use {
                node: e.id,
                object: obj,
            });
            return e;
        }

        let qual = path.rsplit('/').next().unwrap_or(path).to_string();
        let x = self.ident(&qual);
        let pkg_obj = self.add_object(&qual, None, ObjectKind::PkgName, None);
        self.info.uses.push(Use {
            node: x.id,
            object: pkg_obj,
        });
        let sel = self.ident(name);
        self.info.uses.push(Use {
            node: sel.id,
            object: obj,
        });
        self.node(ExprKind::Selector {
            x: Box::new(x),
            sel: Box::new(sel),
        })
    }

    /// Bound method value `recv.name` for a method of `recv_type` in `path`.
    pub fn method_value(&mut self, recv: Expr, path: &str, recv_type: &str, name: &str) -> Expr {
        self.method_selector(recv, path, recv_type, name, SelectionKind::MethodVal)
    }

    /// Method expression `(*pkg.T).name`; the receiver becomes the first argument.
    pub fn method_expr(&mut self, path: &str, recv_type: &str, name: &str) -> Expr {
        let qual = path.rsplit('/').next().unwrap_or(path).to_string();
        let q = self.ident(&qual);
        let t = self.ident(recv_type);
        let sel = self.node(ExprKind::Selector {
            x: Box::new(q),
            sel: Box::new(t),
        });
        let star = self.node(ExprKind::Star { x: Box::new(sel) });
        let x = self.paren(star);
        self.method_selector(x, path, recv_type, name, SelectionKind::MethodExpr)
    }

    fn method_selector(
        &mut self,
        x: Expr,
        path: &str,
        recv_type: &str,
        name: &str,
        kind: SelectionKind,
    ) -> Expr {
        let obj = self.func_object(path, Some(recv_type), name);
        let sel = self.ident(name);
        self.info.uses.push(Use {
            node: sel.id,
            object: obj,
        });
        let e = self.node(ExprKind::Selector {
            x: Box::new(x),
            sel: Box::new(sel),
        });
        self.info.selections.push(SelectionRecord {
            node: e.id,
            kind,
            object: obj,
        });
        e
    }

    /// Field selector `x.name` of type `ty`.
    pub fn field_value(&mut self, x: Expr, name: &str, ty: TypeId) -> Expr {
        let path = self.import_path.clone();
        let obj = self.add_object(name, Some(&path), ObjectKind::Var, None);
        let sel = self.ident(name);
        self.info.uses.push(Use {
            node: sel.id,
            object: obj,
        });
        let e = self.node(ExprKind::Selector {
            x: Box::new(x),
            sel: Box::new(sel),
        });
        self.info.selections.push(SelectionRecord {
            node: e.id,
            kind: SelectionKind::FieldVal,
            object: obj,
        });
        self.record(e.id, Some(ty), Mode::Variable);
        e
    }

    pub fn call(&mut self, fun: Expr, args: Vec<Expr>) -> Expr {
        self.node(ExprKind::Call {
            fun: Box::new(fun),
            args,
            ellipsis: false,
        })
    }

    /// Call whose result has type `ty` (a tuple for multi-value results).
    pub fn call_typed(&mut self, fun: Expr, args: Vec<Expr>, ty: TypeId) -> Expr {
        let e = self.call(fun, args);
        self.record(e.id, Some(ty), Mode::Value);
        e
    }

    /// A node the printer cannot render.
    pub fn bad(&mut self) -> Expr {
        self.node(ExprKind::Bad)
    }

    // -- files ------------------------------------------------------------

    /// Append a statement root to the current file on a new line.
    pub fn stmt(&mut self, mut e: Expr) -> &mut Self {
        self.line += 1;
        let mut col = 2;
        assign_spans(&mut e, &self.current.path, self.line, &mut col);
        self.current.exprs.push(e);
        self
    }

    /// Start a new file; subsequent statements go there.
    pub fn file(&mut self, path: &str) -> &mut Self {
        let next = SourceFile {
            path: path.into(),
            is_generated: false,
            is_test: path.ends_with("_test.go"),
            exprs: vec![],
        };
        let done = std::mem::replace(&mut self.current, next);
        if !done.exprs.is_empty() {
            self.files.push(done);
        }
        self.line = 0;
        self
    }

    /// Mark the current file as generated code.
    pub fn generated(&mut self) -> &mut Self {
        self.current.is_generated = true;
        self
    }

    pub fn build(mut self) -> Package {
        if !self.current.exprs.is_empty() {
            self.files.push(self.current);
        }
        Package {
            import_path: self.import_path,
            name: self.name,
            files: self.files,
            types: self.types,
            objects: self.objects,
            info: self.info,
        }
    }

    pub fn build_input(self) -> AnalysisInput {
        AnalysisInput {
            packages: vec![self.build()],
            go_version: "go1.24".into(),
            bridge_version: String::new(),
        }
    }
}

fn assign_spans(e: &mut Expr, file: &str, line: u32, col: &mut u32) {
    if e.span.is_none() {
        e.span = Some(Span::new(file, line, *col));
    }
    *col += 1;
    for_each_child_mut(e, |c| assign_spans(c, file, line, col));
}

fn for_each_child_mut(e: &mut Expr, mut f: impl FnMut(&mut Expr)) {
    match &mut e.kind {
        ExprKind::Ident { .. } | ExprKind::BasicLit { .. } | ExprKind::Bad => {}
        ExprKind::CompositeLit { ty, elts } => {
            if let Some(t) = ty {
                f(t);
            }
            elts.iter_mut().for_each(&mut f);
        }
        ExprKind::KeyValue { key: a, value: b }
        | ExprKind::Selector { x: a, sel: b }
        | ExprKind::Binary { x: a, y: b, .. }
        | ExprKind::MapType { key: a, value: b } => {
            f(a);
            f(b);
        }
        ExprKind::Paren { x }
        | ExprKind::Star { x }
        | ExprKind::Unary { x, .. }
        | ExprKind::ChanType { value: x, .. } => f(x),
        ExprKind::Index { x, indices } => {
            f(x);
            indices.iter_mut().for_each(&mut f);
        }
        ExprKind::Call { fun, args, .. } => {
            f(fun);
            args.iter_mut().for_each(&mut f);
        }
        ExprKind::FuncLit { ty, body } => {
            f(ty);
            body.iter_mut().for_each(&mut f);
        }
        ExprKind::Slice {
            x, low, high, max, ..
        } => {
            f(x);
            for part in [low, high, max].into_iter().flatten() {
                f(part);
            }
        }
        ExprKind::TypeAssert { x, ty } => {
            f(x);
            if let Some(t) = ty {
                f(t);
            }
        }
        ExprKind::ArrayType { len, elem } => {
            if let Some(l) = len {
                f(l);
            }
            f(elem);
        }
        ExprKind::Ellipsis { elt } => {
            if let Some(t) = elt {
                f(t);
            }
        }
        ExprKind::FuncType { params, results } => {
            params.iter_mut().chain(results.iter_mut()).for_each(|p| f(&mut p.ty));
        }
        ExprKind::StructType { fields } | ExprKind::InterfaceType { methods: fields } => {
            fields.iter_mut().for_each(|p| f(&mut p.ty));
        }
    }
}
