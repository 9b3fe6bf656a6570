use deriv_ir::{lower, PackageSpec, Program, ProgramSpec};
use deriv_types::{Idx, Pool};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use super::{Generator, Handles, Plugin, PluginDef, PluginRegistry};
use crate::{Config, DeriveError};

fn empty_program() -> Program {
    let spec = ProgramSpec {
        packages: vec![PackageSpec::new("app")],
    };
    lower(&spec, &FxHashMap::default(), &[]).unwrap()
}

/// Accepts one argument and emits a function returning it.
struct Identity;

impl Plugin for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn validate(&self, _pool: &Pool, _local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        if args.len() == 1 {
            Ok(())
        } else {
            Err(DeriveError::mismatch("identity", "expected 1 argument"))
        }
    }

    fn results(&self, _pool: &mut Pool, sig: &[Idx]) -> Vec<Idx> {
        vec![sig[0]]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let ty = gen.ty(sig[0]);
        gen.open(&format!("func {}(v {ty}) {ty} {{", gen.name()));
        gen.line("return v");
        gen.close("}");
        Ok(())
    }
}

fn build_identity(_handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Identity))
}

fn build_haunted(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    handles.get("ghost")?;
    Ok(Box::new(Identity))
}

const IDENTITY: PluginDef = PluginDef {
    name: "identity",
    depends_on: &[],
    build: build_identity,
};

#[test]
fn standard_registry_lists_every_plugin() {
    let names: Vec<_> = PluginRegistry::standard().names().collect();
    assert_eq!(
        names,
        vec![
            "equal",
            "compare",
            "hash",
            "clone",
            "keys",
            "sort",
            "min",
            "max",
            "contains",
            "union",
            "intersect",
            "unique",
            "mem",
        ]
    );
}

#[test]
fn unknown_dependency_fails_instantiation() {
    let program = empty_program();
    let mut registry = PluginRegistry::new();
    registry.register(PluginDef {
        name: "haunted",
        depends_on: &["ghost"],
        build: build_haunted,
    });
    let err = registry
        .instantiate(&Config::new(), &program.packages[0])
        .err()
        .unwrap();
    match err {
        DeriveError::MissingDependency { plugin, dependency } => {
            assert_eq!(plugin, "haunted");
            assert_eq!(dependency, "ghost");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn register_replaces_by_name() {
    let mut registry = PluginRegistry::standard();
    let before = registry.defs().len();
    registry.register(PluginDef {
        name: "keys",
        ..IDENTITY
    });
    registry.register(IDENTITY);
    assert_eq!(registry.defs().len(), before + 1);
    assert_eq!(registry.defs()[4].name, "keys");
    assert_eq!(registry.names().last(), Some("identity"));
}

#[test]
fn dispatch_prefers_the_longest_prefix() {
    let program = empty_program();
    let config = Config::new().with_prefix("identity", "deriveEqualish");
    let mut registry = PluginRegistry::standard();
    registry.register(IDENTITY);
    let set = registry.instantiate(&config, &program.packages[0]).unwrap();

    let equal = set.dispatch("deriveEqualPtrToFoo").unwrap();
    assert_eq!(set.plugin_name(equal), "equal");
    let identity = set.dispatch("deriveEqualishThing").unwrap();
    assert_eq!(set.plugin_name(identity), "identity");
    let compare = set.dispatch("deriveCompare").unwrap();
    assert_eq!(set.plugin_name(compare), "compare");
    assert_eq!(set.dispatch("fmtPrintln"), None);
}

#[test]
fn failed_validation_registers_nothing() {
    let program = empty_program();
    let mut set = PluginRegistry::standard()
        .instantiate(&Config::new(), &program.packages[0])
        .unwrap();
    let equal = set.dispatch("deriveEqual").unwrap();
    let err = set
        .add(&program.pool, equal, "deriveEqual", &[Idx::INT])
        .unwrap_err();
    assert!(matches!(err, DeriveError::SignatureMismatch { .. }));
    assert!(set.map(equal).entries().is_empty());
    assert!(set.done());
}

#[test]
fn custom_plugins_generate_through_the_set() {
    let mut program = empty_program();
    let mut registry = PluginRegistry::new();
    registry.register(IDENTITY);
    let mut set = registry
        .instantiate(&Config::new(), &program.packages[0])
        .unwrap();
    let identity = set.dispatch("deriveIdentity").unwrap();
    let name = set
        .add(&program.pool, identity, "deriveIdentity", &[Idx::STRING])
        .unwrap();
    assert_eq!(name, "deriveIdentity");
    assert!(!set.done());

    let drained = set.drain(&mut program.pool).unwrap();
    assert!(set.done());
    assert_eq!(drained.decls.len(), 1);
    assert_eq!(drained.decls[0].plugin, "identity");
    assert_eq!(drained.decls[0].results, vec![Idx::STRING]);
    assert_eq!(
        drained.decls[0].text,
        "func deriveIdentity(v string) string {\n\treturn v\n}\n"
    );
}
