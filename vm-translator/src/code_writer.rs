use std::io::Write;

use crate::errors::{TranslateError, VmError};

// 定义一个宏来简化汇编代码的写入
macro_rules! write_asm {
    ($writer:expr, $($line:literal)*) => {
        $writer.write_all(concat!($($line, "\n"),*).as_bytes())
    };
}

#[derive(Clone, Copy)]
enum SegmentSymbol {
    Local,
    Argument,
    This,
    That,
    Temp,
    Pointer,
    Static,
    Constant,
}

impl SegmentSymbol {
    fn from_str(segment: &str) -> Option<Self> {
        match segment {
            "local" => Some(SegmentSymbol::Local),
            "argument" => Some(SegmentSymbol::Argument),
            "this" => Some(SegmentSymbol::This),
            "that" => Some(SegmentSymbol::That),
            "temp" => Some(SegmentSymbol::Temp),
            "pointer" => Some(SegmentSymbol::Pointer),
            "static" => Some(SegmentSymbol::Static),
            "constant" => Some(SegmentSymbol::Constant),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            SegmentSymbol::Local => "LCL",
            SegmentSymbol::Argument => "ARG",
            SegmentSymbol::This => "THIS",
            SegmentSymbol::That => "THAT",
            SegmentSymbol::Temp
            | SegmentSymbol::Pointer
            | SegmentSymbol::Static
            | SegmentSymbol::Constant => unreachable!("handled by dedicated branches"),
        }
    }
}

/// Emits Hack assembly for one translation unit (one `.vm` file, or the
/// synthetic bootstrap prelude) into a shared output stream.
///
/// Carries the per-function state the calling convention needs: the name of
/// the function currently being translated (for label scoping) and a
/// per-function call counter (for `F$ret.k` labels), matching
/// `Translator.function`/`Translator.calls` in the Python reference.
pub struct CodeWriter<W: Write> {
    out: W,
    module: String,
    function: String,
    call_counter: usize,
    label_counter: usize,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W) -> Self {
        CodeWriter {
            out,
            module: String::new(),
            function: String::new(),
            call_counter: 0,
            label_counter: 0,
        }
    }

    /// Sets the module name used to qualify `static` segment variables.
    /// Extracted from the source file's basename, matching the teacher's
    /// `set_filename`.
    pub fn set_module(&mut self, module: &str) {
        self.module.clear();
        self.module.push_str(module);
    }

    fn make_label(&self, name: &str) -> String {
        format!("{}${}", self.function, name)
    }

    pub fn write_bootstrap(&mut self) -> Result<(), TranslateError> {
        write_asm!(self.out,
            "// bootstrap: SP=256"
            "@256"
            "D=A"
            "@SP"
            "M=D"
        )?;
        self.write_call("Sys.init", 0)
    }

    pub fn write_arithmetic(&mut self, command: &str) -> Result<(), TranslateError> {
        writeln!(self.out, "// {command}")?;
        match command {
            // D holds the popped second operand (y), M the first (x); the
            // RHS is written in terms of those so `M={rhs}` is the final
            // value — non-commutative ops must read M-D (x-y), not D-M.
            "add" => self.write_binary_op("D+M"),
            "sub" => self.write_binary_op("M-D"),
            "and" => self.write_binary_op("D&M"),
            "or" => self.write_binary_op("D|M"),
            "neg" => self.write_unary_op(true),
            "not" => self.write_unary_op(false),
            "eq" => self.write_comparison("JEQ"),
            "gt" => self.write_comparison("JGT"),
            "lt" => self.write_comparison("JLT"),
            other => Err(VmError::UnknownCommand(other.to_string()).into()),
        }
    }

    #[inline]
    fn write_binary_op(&mut self, rhs: &str) -> Result<(), TranslateError> {
        write!(
            self.out,
            "@SP\n\
             AM=M-1\n\
             D=M\n\
             A=A-1\n\
             M={rhs}\n",
        )?;
        Ok(())
    }

    #[inline]
    fn write_unary_op(&mut self, is_neg: bool) -> Result<(), TranslateError> {
        write_asm!(self.out, "@SP")?;
        if is_neg {
            write_asm!(self.out,
                "A=M-1"
                "M=-M"
            )?;
        } else {
            write_asm!(self.out,
                "A=M-1"
                "M=!M"
            )?;
        }
        Ok(())
    }

    #[inline]
    fn write_comparison(&mut self, jump: &str) -> Result<(), TranslateError> {
        let label_num = self.label_counter;
        self.label_counter += 1;
        let true_label = format!("{}.{}.TRUE", self.make_label("cmp"), label_num);
        let end_label = format!("{}.{}.END", self.make_label("cmp"), label_num);

        write!(
            self.out,
            "@SP\n\
             AM=M-1\n\
             D=-M\n\
             A=A-1\n\
             D=D+M\n\
             @{true_label}\n\
             D;{jump}\n\
             D=0\n\
             @{end_label}\n\
             0;JMP\n\
             ({true_label})\n\
             D=-1\n\
             ({end_label})\n\
             @SP\n\
             A=M-1\n\
             M=D\n",
        )?;
        Ok(())
    }

    pub fn write_push_pop(
        &mut self,
        command: &str,
        segment: &str,
        index: i32,
    ) -> Result<(), TranslateError> {
        writeln!(self.out, "// {command} {segment} {index}")?;
        match command {
            "push" => self.write_push(segment, index),
            "pop" => self.write_pop(segment, index),
            other => Err(VmError::UnknownCommand(other.to_string()).into()),
        }
    }

    fn write_push(&mut self, segment: &str, index: i32) -> Result<(), TranslateError> {
        let seg = SegmentSymbol::from_str(segment)
            .ok_or_else(|| VmError::UnknownSegment(segment.to_string()))?;
        match seg {
            SegmentSymbol::Constant => {
                write!(self.out, "@{index}\nD=A\n")?;
            }
            SegmentSymbol::Local
            | SegmentSymbol::Argument
            | SegmentSymbol::This
            | SegmentSymbol::That => {
                write!(self.out, "@{index}\nD=A\n@{}\nA=D+M\nD=M\n", seg.symbol())?;
            }
            SegmentSymbol::Temp => {
                let addr = 5 + index;
                write!(self.out, "@{addr}\nD=M\n")?;
            }
            SegmentSymbol::Pointer => {
                let addr = pointer_register(index)?;
                write!(self.out, "@{addr}\nD=M\n")?;
            }
            SegmentSymbol::Static => {
                write!(self.out, "@{}.{}\nD=M\n", self.module, index)?;
            }
        }
        self.write_push_d()
    }

    fn write_pop(&mut self, segment: &str, index: i32) -> Result<(), TranslateError> {
        let seg = SegmentSymbol::from_str(segment)
            .ok_or_else(|| VmError::UnknownSegment(segment.to_string()))?;
        match seg {
            SegmentSymbol::Constant => Err(VmError::UnknownSegment(
                "constant is not a valid pop target".to_string(),
            )
            .into()),
            SegmentSymbol::Local
            | SegmentSymbol::Argument
            | SegmentSymbol::This
            | SegmentSymbol::That => {
                write!(
                    self.out,
                    "@{index}\nD=A\n@{}\nD=D+M\n@R13\nM=D\n",
                    seg.symbol()
                )?;
                self.write_pop_to_d()?;
                write_asm!(self.out,
                    "@R13"
                    "A=M"
                    "M=D"
                )?;
                Ok(())
            }
            SegmentSymbol::Temp => {
                let addr = 5 + index;
                self.write_pop_to_d()?;
                write!(self.out, "@{addr}\nM=D\n")?;
                Ok(())
            }
            SegmentSymbol::Pointer => {
                let addr = pointer_register(index)?;
                self.write_pop_to_d()?;
                write!(self.out, "@{addr}\nM=D\n")?;
                Ok(())
            }
            SegmentSymbol::Static => {
                self.write_pop_to_d()?;
                write!(self.out, "@{}.{}\nM=D\n", self.module, index)?;
                Ok(())
            }
        }
    }

    #[inline]
    fn write_push_d(&mut self) -> Result<(), TranslateError> {
        write_asm!(self.out,
            "@SP"
            "M=M+1"
            "A=M-1"
            "M=D"
        )?;
        Ok(())
    }

    #[inline]
    fn write_pop_to_d(&mut self) -> Result<(), TranslateError> {
        write_asm!(self.out,
            "@SP"
            "AM=M-1"
            "D=M"
        )?;
        Ok(())
    }

    pub fn write_label(&mut self, name: &str) -> Result<(), TranslateError> {
        writeln!(self.out, "({})", self.make_label(name))?;
        Ok(())
    }

    pub fn write_goto(&mut self, name: &str) -> Result<(), TranslateError> {
        write!(self.out, "@{}\n0;JMP\n", self.make_label(name))?;
        Ok(())
    }

    pub fn write_if_goto(&mut self, name: &str) -> Result<(), TranslateError> {
        write_asm!(self.out,
            "@SP"
            "AM=M-1"
            "D=M"
        )?;
        write!(self.out, "@{}\nD;JNE\n", self.make_label(name))?;
        Ok(())
    }

    /// `function F n`: emit label `F`, then push `n` zeros to initialize
    /// locals, matching the return sequence's assumption that `LCL` sits
    /// right below the locals on entry.
    pub fn write_function(&mut self, name: &str, num_locals: u16) -> Result<(), TranslateError> {
        self.function = name.to_string();
        self.call_counter = 0;
        writeln!(self.out, "({name})")?;
        for _ in 0..num_locals {
            write!(self.out, "@SP\nM=M+1\nA=M-1\nM=0\n")?;
        }
        Ok(())
    }

    /// Invariant calling sequence: push return address, save the caller's
    /// segment pointers, rebase `ARG`/`LCL` for the callee, jump.
    pub fn write_call(&mut self, name: &str, num_args: u16) -> Result<(), TranslateError> {
        self.call_counter += 1;
        let return_label = format!("{}$ret.{}", self.function, self.call_counter);

        writeln!(self.out, "// call {name} {num_args}")?;
        write!(
            self.out,
            "@{return_label}\nD=A\n@SP\nM=M+1\nA=M-1\nM=D\n",
        )?;

        for segment in ["LCL", "ARG", "THIS", "THAT"] {
            write!(self.out, "@{segment}\nD=M\n@SP\nM=M+1\nA=M-1\nM=D\n")?;
        }

        let offset = 5 + num_args;
        write!(
            self.out,
            "@SP\nD=M\n@LCL\nM=D\n@{offset}\nD=D-A\n@ARG\nM=D\n@{name}\n0;JMP\n({return_label})\n",
        )?;
        Ok(())
    }

    /// Five-step return sequence: snapshot the frame, restore the return
    /// value and stack pointer, then restore the caller's segment pointers
    /// from the saved frame before jumping back.
    pub fn write_return(&mut self) -> Result<(), TranslateError> {
        write_asm!(self.out,
            "// return"
            "@LCL"
            "D=M"
            "@R14"
            "M=D"
        )?;
        // copy the return value down to ARG[0] before anything else moves SP
        write!(self.out, "@R14\nD=M\n@5\nA=D-A\nD=M\n@R15\nM=D\n")?;

        write_asm!(self.out,
            "@SP"
            "A=M-1"
            "D=M"
            "@ARG"
            "A=M"
            "M=D"
            "D=A+1"
            "@SP"
            "M=D"
        )?;

        for (offset, segment) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            write!(self.out, "@R14\nD=M\n@{offset}\nA=D-A\nD=M\n@{segment}\nM=D\n")?;
        }

        write!(self.out, "@R15\nA=M\n0;JMP\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), TranslateError> {
        self.out.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying output sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn pointer_register(index: i32) -> Result<&'static str, VmError> {
    match index {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        other => Err(VmError::InvalidPointerOffset(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> CodeWriter<Vec<u8>> {
        CodeWriter::new(Vec::new())
    }

    fn text(cw: CodeWriter<Vec<u8>>) -> String {
        String::from_utf8(cw.out).unwrap()
    }

    #[test]
    fn push_constant_emits_literal_load() {
        let mut cw = writer();
        cw.write_push_pop("push", "constant", 7).unwrap();
        let out = text(cw);
        assert!(out.contains("@7"));
        assert!(out.contains("D=A"));
    }

    #[test]
    fn push_local_uses_lcl_base() {
        let mut cw = writer();
        cw.write_push_pop("push", "local", 2).unwrap();
        assert!(text(cw).contains("@LCL"));
    }

    #[test]
    fn push_temp_uses_fixed_base_five() {
        let mut cw = writer();
        cw.write_push_pop("push", "temp", 3).unwrap();
        assert!(text(cw).contains("@8"));
    }

    #[test]
    fn push_static_is_module_qualified() {
        let mut cw = writer();
        cw.set_module("Foo");
        cw.write_push_pop("push", "static", 3).unwrap();
        assert!(text(cw).contains("@Foo.3"));
    }

    #[test]
    fn pop_to_constant_is_rejected() {
        let mut cw = writer();
        assert!(cw.write_push_pop("pop", "constant", 0).is_err());
    }

    #[test]
    fn pointer_offset_must_be_zero_or_one() {
        let mut cw = writer();
        let err = cw.write_push_pop("push", "pointer", 2).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Vm(VmError::InvalidPointerOffset(2))
        ));
    }

    #[test]
    fn labels_are_scoped_to_enclosing_function() {
        let mut cw = writer();
        cw.write_function("Main.loop", 0).unwrap();
        cw.write_label("TOP").unwrap();
        assert!(text(cw).contains("(Main.loop$TOP)"));
    }

    #[test]
    fn call_labels_increment_per_function() {
        let mut cw = writer();
        cw.write_function("Main.run", 0).unwrap();
        cw.write_call("Foo.bar", 1).unwrap();
        cw.write_call("Foo.baz", 0).unwrap();
        let out = text(cw);
        assert!(out.contains("(Main.run$ret.1)"));
        assert!(out.contains("(Main.run$ret.2)"));
    }

    #[test]
    fn function_prologue_pushes_n_zero_locals() {
        let mut cw = writer();
        cw.write_function("Main.f", 3).unwrap();
        let out = text(cw);
        assert_eq!(out.matches("M=0").count(), 3);
    }

    #[test]
    fn unknown_arithmetic_command_is_rejected() {
        let mut cw = writer();
        assert!(cw.write_arithmetic("xor").is_err());
    }
}
