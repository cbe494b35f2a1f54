//! Executes packed bundles in an embedded JavaScript engine.

use std::fs;

use boa_engine::{Context, Source};
use module_packer::output::write_bundle;
use module_packer::{ModuleMap, ModuleRecord, PackOptions, Packer};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn run(script: &str) -> String {
    let mut context = Context::default();
    let value = context
        .eval(Source::from_bytes(script))
        .unwrap_or_else(|err| panic!("script failed: {err}\n{script}"));
    value
        .to_string(&mut context)
        .unwrap()
        .to_std_string_escaped()
}

/// Assign the bundle to `out` the way a host page would, then evaluate `check`.
fn evaluate(bundle: &str, check: &str) -> String {
    run(&format!("var out = {bundle}\n;\n{check}"))
}

fn packer(records: impl IntoIterator<Item = ModuleRecord>, options: PackOptions) -> Packer {
    Packer::with_modules(ModuleMap::from_records(records).unwrap(), options)
}

fn umd_bundle() -> String {
    let mut packer = packer(
        [ModuleRecord::js("main", "module.exports = { kind: 'lib' }").with_name("my-lib")],
        PackOptions::default().with_umd(true),
    );
    packer.pack("main").unwrap()
}

#[test]
fn packs_a_module() {
    let mut packer = Packer::new(PackOptions::default());
    packer
        .add(ModuleRecord::js("a", "module.exports = \"a\""))
        .unwrap();

    let js = packer.pack("a").unwrap();
    assert_eq!(evaluate(&js, "out(1)"), "a");
}

#[test]
fn packs_modules_fed_over_several_calls() {
    let mut packer = Packer::new(PackOptions::default());
    packer
        .add(ModuleRecord::js("a", "module.exports = \"a\""))
        .unwrap();
    let mut js = packer.pack_chunk("a").unwrap();

    packer
        .add(ModuleRecord::js("b", "module.exports = \"b\"").with_dep("a", "a"))
        .unwrap();
    js += &packer.pack("b").unwrap();

    assert_eq!(evaluate(&js, "out(2)"), "b");
}

#[test]
fn resolves_dependencies_packed_by_earlier_calls() {
    let mut packer = Packer::new(PackOptions::default());
    packer
        .add(ModuleRecord::js("a", "module.exports = \"a\""))
        .unwrap();
    let mut js = packer.pack_chunk("a").unwrap();

    packer
        .add(ModuleRecord::js("b", "module.exports = require(\"a\")").with_dep("a", "a"))
        .unwrap();
    js += &packer.pack("b").unwrap();

    assert_eq!(evaluate(&js, "out(2)"), "a");
}

#[test]
fn written_bundle_matches_returned_text() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("a.js");
    let mut packer = packer(
        [ModuleRecord::js("a", "module.exports = \"a\"")],
        PackOptions::default(),
    );

    let js = packer.pack("a").unwrap();
    write_bundle(&target, &js).unwrap();

    let written = fs::read_to_string(&target).unwrap();
    assert_eq!(written, js);
    assert_eq!(evaluate(&written, "out(1)"), "a");
}

#[test]
fn exposes_named_modules_to_outside_callers() {
    let mut packer = Packer::new(PackOptions::default());
    packer
        .add(
            ModuleRecord::js(
                "module",
                "module.exports = [require(\"./utils\"), require(\"dep\")]",
            )
            .with_entry()
            .with_name("boot")
            .with_dep("dep", "dep")
            .with_dep("./utils", "./utils"),
        )
        .unwrap();
    let mut js = packer.pack_chunk("module").unwrap();

    packer
        .add(
            ModuleRecord::js("./utils", "module.exports = \"utils\"")
                .with_name("boot-utils")
                .with_dep("dep", "dep"),
        )
        .unwrap();
    js += &packer.pack_chunk("./utils").unwrap();

    packer
        .add(ModuleRecord::js("dep", "module.exports = \"dep\"").with_name("dep"))
        .unwrap();
    js += &packer.pack("dep").unwrap();

    assert_eq!(
        evaluate(
            &js,
            "[JSON.stringify(out('boot')), out('boot-utils'), out('dep')].join('|')"
        ),
        r#"["utils","dep"]|utils|dep"#
    );
}

#[test]
fn factories_run_once_and_share_exports() {
    let mut packer = packer(
        [ModuleRecord::js(
            "main",
            "globalThis.runs = (globalThis.runs || 0) + 1;\nmodule.exports = { id: 'main' };",
        )
        .with_name("main")],
        PackOptions::default(),
    );

    let js = packer.pack("main").unwrap();
    assert_eq!(
        evaluate(&js, "[out(1) === out(1), out('main') === out(1), runs].join()"),
        "true,true,1"
    );
}

#[test]
fn cyclic_require_sees_partial_exports() {
    let mut packer = packer(
        [
            ModuleRecord::js(
                "a",
                "exports.early = 'a';\nvar b = require('./b');\nexports.late = 'a';\nexports.seen = b.seen;",
            )
            .with_dep("./b", "b"),
            ModuleRecord::js(
                "b",
                "var a = require('./a');\nexports.seen = JSON.stringify(a);",
            )
            .with_dep("./a", "a"),
        ],
        PackOptions::default(),
    );

    let js = packer.pack("a").unwrap();
    assert_eq!(evaluate(&js, "out(1).seen"), r#"{"early":"a"}"#);
    assert_eq!(evaluate(&js, "out(1).late"), "a");
}

#[test]
fn throwing_factory_can_be_retried() {
    let mut packer = packer(
        [ModuleRecord::js(
            "flaky",
            "globalThis.attempts = (globalThis.attempts || 0) + 1;\n\
             if (attempts === 1) throw new Error('boom');\n\
             module.exports = attempts;",
        )],
        PackOptions::default(),
    );

    let js = packer.pack("flaky").unwrap();
    let check = "var first;\n\
                 try { out(1); } catch (err) { first = err.message; }\n\
                 first + ':' + out(1)";
    assert_eq!(evaluate(&js, check), "boom:2");
}

#[test]
fn host_require_is_shadowed_inside_factories() {
    let mut packer = packer(
        [
            ModuleRecord::js("a", "module.exports = require('./b')").with_dep("./b", "b"),
            ModuleRecord::js("b", "module.exports = 'b'"),
        ],
        PackOptions::default(),
    );

    let js = packer.pack("a").unwrap();
    let script =
        format!("var require = function() {{ return 'host'; }};\nvar out = {js}\n;\nout(1)");
    assert_eq!(run(&script), "b");
}

#[test]
fn unknown_slot_throws() {
    let mut packer = packer([ModuleRecord::js("a", "")], PackOptions::default());

    let js = packer.pack("a").unwrap();
    let check = "var message;\ntry { out(9); } catch (err) { message = err.message; }\nmessage";
    assert_eq!(evaluate(&js, check), r#"cannot find module "9""#);
}

#[test]
fn entry_global_is_assigned_on_load() {
    let mut packer = packer(
        [ModuleRecord::js("main", "module.exports = 'booted'").with_global("Boot")],
        PackOptions::default(),
    );

    let js = packer.pack("main").unwrap();
    assert_eq!(evaluate(&js, "Boot"), "booted");
}

#[test]
fn development_bundle_still_evaluates() {
    let mut packer = packer(
        [ModuleRecord::js("a", "module.exports = 'a'")],
        PackOptions::default().with_development(true),
    );

    let js = packer.pack("a").unwrap();
    assert_eq!(evaluate(&js, "out(1)"), "a");
}

#[test]
fn umd_registers_with_amd_loader() {
    let script = format!(
        "var amd = [];\n\
         function define(factory) {{ amd.push(factory()); }}\n\
         define.amd = {{}};\n\
         var module = {{ exports: {{}} }};\n\
         {}\n;\n\
         JSON.stringify([amd, module.exports, typeof globalThis['my-lib']])",
        umd_bundle()
    );
    assert_eq!(run(&script), r#"[[{"kind":"lib"}],{},"undefined"]"#);
}

#[test]
fn umd_registers_with_cmd_loader() {
    let script = format!(
        "var cmd = [];\n\
         function define(factory) {{\n\
           var local = {{ exports: {{}} }};\n\
           factory(function() {{}}, local.exports, local);\n\
           cmd.push(local.exports);\n\
         }}\n\
         define.cmd = {{}};\n\
         var module = {{ exports: {{}} }};\n\
         {}\n;\n\
         JSON.stringify([cmd, module.exports, typeof globalThis['my-lib']])",
        umd_bundle()
    );
    assert_eq!(run(&script), r#"[[{"kind":"lib"}],{},"undefined"]"#);
}

#[test]
fn umd_assigns_commonjs_exports() {
    let script = format!(
        "var module = {{ exports: {{}} }};\n\
         {}\n;\n\
         JSON.stringify([module.exports, typeof globalThis['my-lib']])",
        umd_bundle()
    );
    assert_eq!(run(&script), r#"[{"kind":"lib"},"undefined"]"#);
}

#[test]
fn umd_falls_back_to_root_property() {
    let script = format!("{}\n;\nJSON.stringify(globalThis['my-lib'])", umd_bundle());
    assert_eq!(run(&script), r#"{"kind":"lib"}"#);
}

#[test]
fn umd_prefers_amd_when_define_supports_both() {
    let script = format!(
        "var calls = [];\n\
         function define(factory) {{ calls.push(factory.length); factory(); }}\n\
         define.amd = {{}};\n\
         define.cmd = {{}};\n\
         {}\n;\n\
         calls.join()",
        umd_bundle()
    );
    assert_eq!(run(&script), "0");
}
