//! Jack Compiler for the `Nand2Tetris` course
//!
//! Recursive-descent compiler translating one Jack class directly to VM
//! text, with no intermediate AST — grounded in
//! `original_source/projects/11/compiler.py`.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

pub mod compiler;
pub mod errors;
pub mod symbol_table;

pub use compiler::Compiler;
pub use errors::{CompileError, JackError};
pub use symbol_table::{SymbolRecord, SymbolTable, VarKind};

/// Compiles a single Jack source file's contents to VM text.
///
/// # Errors
/// Returns [`CompileError`] on any lexical, syntactic, or semantic failure.
pub fn compile_source(source: &str) -> Result<String, CompileError> {
    let mut compiler = Compiler::new(source, Vec::new());
    compiler.compile_class()?;
    let bytes = compiler.into_inner();
    Ok(String::from_utf8(bytes).expect("emitted VM text is always valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_class_with_a_field_and_a_method() {
        let src = r#"
            class Point {
                field int x, y;

                constructor Point new(int ax, int ay) {
                    let x = ax;
                    let y = ay;
                    return this;
                }

                method int getX() {
                    return x;
                }
            }
        "#;
        let vm = compile_source(src).unwrap();
        assert!(vm.contains("function Point.new 0"));
        assert!(vm.contains("call Memory.alloc 1"));
        assert!(vm.contains("pop pointer 0"));
        assert!(vm.contains("function Point.getX 0"));
        assert!(vm.contains("push argument 0"));
    }

    #[test]
    fn array_assignment_defers_pointer_1_rebase_until_after_the_rhs() {
        let src = r#"
            class Main {
                function void main() {
                    var Array a, b;
                    let a[0] = b[1];
                    return;
                }
            }
        "#;
        let vm = compile_source(src).unwrap();
        let pop_temp = vm.find("pop temp 0").unwrap();
        let pop_pointer = vm.find("pop pointer 1").unwrap();
        assert!(pop_temp < pop_pointer);
    }

    #[test]
    fn while_and_if_labels_are_scoped_by_class_name_and_counter() {
        let src = r#"
            class Main {
                function void main() {
                    var int x;
                    if (true) {
                        while (true) {
                            let x = 1;
                        }
                    }
                    return;
                }
            }
        "#;
        let vm = compile_source(src).unwrap();
        assert!(vm.contains("label Main.L1.ELSE"));
        assert!(vm.contains("label Main.L2.WHILE"));
    }

    #[test]
    fn undeclared_identifier_is_an_error() {
        let src = r#"
            class Main {
                function void main() {
                    let x = 1;
                    return;
                }
            }
        "#;
        let err = compile_source(src).unwrap_err();
        assert!(matches!(err, CompileError::Jack(JackError::UndeclaredIdentifier(_))));
    }

    #[test]
    fn method_call_on_same_class_passes_this_as_implicit_argument() {
        let src = r#"
            class Counter {
                field int value;

                method void increment() {
                    do bump();
                    return;
                }

                method void bump() {
                    let value = value;
                    return;
                }
            }
        "#;
        let vm = compile_source(src).unwrap();
        assert!(vm.contains("call Counter.bump 1"));
    }

    #[test]
    fn static_function_call_on_an_unknown_name_uses_class_dispatch() {
        let src = r#"
            class Main {
                function void main() {
                    do Output.printString("hi");
                    return;
                }
            }
        "#;
        let vm = compile_source(src).unwrap();
        assert!(vm.contains("call Output.printString 1"));
    }

    #[test]
    fn duplicate_local_declaration_is_an_error() {
        let src = r#"
            class Main {
                function void main() {
                    var int x;
                    var int x;
                    return;
                }
            }
        "#;
        let err = compile_source(src).unwrap_err();
        assert!(matches!(err, CompileError::Jack(JackError::DuplicateSymbol(_))));
    }
}
