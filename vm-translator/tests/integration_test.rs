//! End-to-end VM translator tests, driven through the library API with
//! literal VM source strings so they don't depend on external `.vm`/`.asm`
//! fixture directories.

use vm_translator::{translate_module, CodeWriter};

fn translate(lines: &[&str], module: &str) -> String {
    let mut writer = CodeWriter::new(Vec::new());
    translate_module(
        lines.iter().map(|l| (*l).to_string()).collect(),
        module,
        &mut writer,
    )
    .unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

#[test]
fn simple_add_pushes_two_constants_and_sums_them() {
    let asm = translate(&["push constant 7", "push constant 8", "add"], "SimpleAdd");
    assert!(asm.contains("@7"));
    assert!(asm.contains("@8"));
    assert!(asm.contains("D+M"));
}

#[test]
fn stack_test_covers_every_arithmetic_command() {
    let asm = translate(
        &[
            "push constant 17",
            "push constant 17",
            "eq",
            "push constant 17",
            "push constant 16",
            "gt",
            "push constant 892",
            "push constant 891",
            "lt",
            "push constant 57",
            "push constant 31",
            "push constant 53",
            "add",
            "push constant 112",
            "sub",
            "neg",
            "and",
            "push constant 82",
            "or",
            "not",
        ],
        "StackTest",
    );
    // Every comparison emits a distinct, function-scoped jump label pair.
    assert_eq!(asm.matches(".TRUE)").count(), 3);
    assert_eq!(asm.matches(".END)").count(), 3);
}

#[test]
fn basic_loop_resolves_label_goto_and_if_goto_inside_function_scope() {
    let asm = translate(
        &[
            "function Main.main 1",
            "push constant 0",
            "pop local 0",
            "label LOOP_START",
            "push local 0",
            "push constant 1",
            "add",
            "pop local 0",
            "push local 0",
            "push constant 100",
            "gt",
            "if-goto LOOP_START",
            "push local 0",
            "return",
        ],
        "BasicLoop",
    );
    assert!(asm.contains("(Main.main$LOOP_START)"));
    assert!(asm.contains("@Main.main$LOOP_START"));
}

#[test]
fn fibonacci_element_exercises_call_return_and_bootstrap() {
    let mut writer = CodeWriter::new(Vec::new());
    writer.write_bootstrap().unwrap();
    translate_module(
        vec![
            "function Main.fibonacci 0".into(),
            "push argument 0".into(),
            "push constant 2".into(),
            "lt".into(),
            "if-goto N_LT_2".into(),
            "goto N_GE_2".into(),
            "label N_LT_2".into(),
            "push argument 0".into(),
            "return".into(),
            "label N_GE_2".into(),
            "push argument 0".into(),
            "push constant 2".into(),
            "sub".into(),
            "call Main.fibonacci 1".into(),
            "push argument 0".into(),
            "push constant 1".into(),
            "sub".into(),
            "call Main.fibonacci 1".into(),
            "add".into(),
            "return".into(),
        ],
        "Main",
        &mut writer,
    )
    .unwrap();

    let asm = String::from_utf8(writer.into_inner()).unwrap();
    // Two recursive calls inside the same function get distinct return labels.
    assert!(asm.contains("(Main.fibonacci$ret.1)"));
    assert!(asm.contains("(Main.fibonacci$ret.2)"));
    // Bootstrap itself is a call to Sys.init from the empty-named scope.
    assert!(asm.contains("@Sys.init"));
}

#[test]
fn static_segment_is_qualified_by_module_name() {
    let asm = translate(&["push constant 1", "pop static 3"], "Foo");
    assert!(asm.contains("@Foo.3"));
}

#[test]
fn unknown_command_is_a_translation_error() {
    let mut writer = CodeWriter::new(Vec::new());
    let result = translate_module(vec!["frobnicate".into()], "Bad", &mut writer);
    assert!(result.is_err());
}
