//! Serializable program description.
//!
//! A `ProgramSpec` is what a front end produces after type checking: type
//! declarations, function signatures and the expression trees of every
//! source file, with the static type of each operand. It round-trips
//! through JSON.
//!
//! ```json
//! { "packages": [{
//!     "path": "example.com/geo",
//!     "types": [{ "name": "Point", "underlying": { "kind": "struct", "fields": [
//!         { "name": "X", "type": { "kind": "basic", "name": "int64" } } ] } }],
//!     "files": [{ "name": "main.go", "exprs": [
//!         { "kind": "call", "func": "deriveEqual", "args": [
//!             { "kind": "value", "text": "a", "type": { "kind": "named", "name": "Point" } },
//!             { "kind": "value", "text": "b", "type": { "kind": "named", "name": "Point" } } ] } ] }]
//! }] }
//! ```


use deriv_types::{ChanDir, Idx, Pool, TypeData};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramSpec {
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

impl ProgramSpec {
    pub fn package(&self, path: &str) -> Option<&PackageSpec> {
        self.packages.iter().find(|p| p.path == path)
    }

    pub fn package_mut(&mut self, path: &str) -> Option<&mut PackageSpec> {
        self.packages.iter_mut().find(|p| p.path == path)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSpec {
    /// Import path.
    pub path: String,
    /// Declared name; defaults to the last path segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDeclSpec>,
    /// Hand-written package-level functions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub funcs: Vec<FuncSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileSpec>,
}

impl PackageSpec {
    pub fn new(path: impl Into<String>) -> Self {
        PackageSpec {
            path: path.into(),
            ..PackageSpec::default()
        }
    }

    /// Declared name, or the last segment of the import path.
    pub fn package_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

/// `type Name Underlying` plus its methods.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDeclSpec {
    pub name: String,
    pub underlying: TypeExpr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pointer_receiver: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

/// A function signature. Used for hand-written functions and for the
/// declarations listed in a generated artifact's manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FuncSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<TypeExpr>,
    /// The last parameter is a slice passed as `...T`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    pub name: String,
    #[serde(default)]
    pub exprs: Vec<ExprSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ExprSpec {
    /// An operand. A missing `type` means the front end could not type it.
    Value {
        text: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        ty: Option<TypeExpr>,
    },
    Call {
        func: String,
        #[serde(default)]
        args: Vec<ExprSpec>,
    },
}

impl ExprSpec {
    pub fn value(text: impl Into<String>, ty: TypeExpr) -> Self {
        ExprSpec::Value {
            text: text.into(),
            ty: Some(ty),
        }
    }

    pub fn untyped(text: impl Into<String>) -> Self {
        ExprSpec::Value {
            text: text.into(),
            ty: None,
        }
    }

    pub fn call(func: impl Into<String>, args: Vec<ExprSpec>) -> Self {
        ExprSpec::Call {
            func: func.into(),
            args,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDirSpec {
    #[default]
    Both,
    Send,
    Recv,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub embedded: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IfaceMethodSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<TypeExpr>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

/// A type written in the schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TypeExpr {
    /// A predeclared type by its spelling (`int64`, `byte`, `unsafe.Pointer`).
    Basic { name: String },
    /// A declared type. Without `package` the name refers to the package
    /// the expression appears in.
    Named {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        package: Option<String>,
        name: String,
    },
    Pointer { elem: Box<TypeExpr> },
    Struct {
        #[serde(default)]
        fields: Vec<FieldSpec>,
    },
    Slice { elem: Box<TypeExpr> },
    Array { len: u64, elem: Box<TypeExpr> },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Func {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        params: Vec<TypeExpr>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        results: Vec<TypeExpr>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        variadic: bool,
    },
    Chan {
        #[serde(default)]
        dir: ChanDirSpec,
        elem: Box<TypeExpr>,
    },
    Interface {
        #[serde(default)]
        methods: Vec<IfaceMethodSpec>,
    },
}

// === Constructors ===

impl TypeExpr {
    pub fn basic(name: impl Into<String>) -> Self {
        TypeExpr::Basic { name: name.into() }
    }

    /// A named type of the enclosing package.
    pub fn local(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
        }
    }

    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: Some(package.into()),
            name: name.into(),
        }
    }

    pub fn pointer(elem: TypeExpr) -> Self {
        TypeExpr::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn array(len: u64, elem: TypeExpr) -> Self {
        TypeExpr::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn func(params: Vec<TypeExpr>, results: Vec<TypeExpr>) -> Self {
        TypeExpr::Func {
            params,
            results,
            variadic: false,
        }
    }

    pub fn chan(elem: TypeExpr) -> Self {
        TypeExpr::Chan {
            dir: ChanDirSpec::Both,
            elem: Box::new(elem),
        }
    }

    /// A struct with the given `(name, type)` fields.
    pub fn structure(fields: Vec<(&str, TypeExpr)>) -> Self {
        TypeExpr::Struct {
            fields: fields
                .into_iter()
                .map(|(name, ty)| FieldSpec {
                    name: name.to_owned(),
                    ty,
                    embedded: false,
                })
                .collect(),
        }
    }
}

// === Export ===

/// Describe a pool type in schema form.
///
/// Named types are always written with their package. Tuples have no
/// schema form and export as `invalid`.
pub fn export_type(pool: &Pool, idx: Idx) -> TypeExpr {
    match pool.data(idx) {
        TypeData::Basic(kind) => TypeExpr::basic(kind.name()),
        TypeData::Named(_) => match pool.named_def(idx) {
            Some(def) => TypeExpr::named(def.package.clone(), def.name.clone()),
            None => TypeExpr::basic("invalid"),
        },
        TypeData::Pointer(elem) => TypeExpr::pointer(export_type(pool, *elem)),
        TypeData::Slice(elem) => TypeExpr::slice(export_type(pool, *elem)),
        TypeData::Array { len, elem } => TypeExpr::array(*len, export_type(pool, *elem)),
        TypeData::Map { key, value } => {
            TypeExpr::map(export_type(pool, *key), export_type(pool, *value))
        }
        TypeData::Struct(fields) => TypeExpr::Struct {
            fields: fields
                .iter()
                .map(|f| FieldSpec {
                    name: f.name.clone(),
                    ty: export_type(pool, f.ty),
                    embedded: f.embedded,
                })
                .collect(),
        },
        TypeData::Signature {
            params,
            results,
            variadic,
        } => TypeExpr::Func {
            params: params.iter().map(|&p| export_type(pool, p)).collect(),
            results: results.iter().map(|&r| export_type(pool, r)).collect(),
            variadic: *variadic,
        },
        TypeData::Tuple(_) => TypeExpr::basic("invalid"),
        TypeData::Channel { dir, elem } => TypeExpr::Chan {
            dir: match dir {
                ChanDir::Both => ChanDirSpec::Both,
                ChanDir::Send => ChanDirSpec::Send,
                ChanDir::Recv => ChanDirSpec::Recv,
            },
            elem: Box::new(export_type(pool, *elem)),
        },
        TypeData::Interface(methods) => TypeExpr::Interface {
            methods: methods
                .iter()
                .map(|m| match export_type(pool, m.signature) {
                    TypeExpr::Func {
                        params,
                        results,
                        variadic,
                    } => IfaceMethodSpec {
                        name: m.name.clone(),
                        params,
                        results,
                        variadic,
                    },
                    _ => IfaceMethodSpec {
                        name: m.name.clone(),
                        params: Vec::new(),
                        results: Vec::new(),
                        variadic: false,
                    },
                })
                .collect(),
        },
    }
}
