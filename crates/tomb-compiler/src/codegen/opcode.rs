//! Instruction set of the target VM
//!
//! The code generator emits assembly text, so an opcode is only ever used
//! through its mnemonic. Operand order follows the VM: sources first,
//! destination last.

use std::fmt;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // ===== Register & stack =====
    Nop = 0,
    /// Move a value, leaving the source empty
    Move = 1,
    Copy = 2,
    Push = 3,
    Pop = 4,
    Swap = 5,

    // ===== Control flow =====
    Call = 6,
    ExtCall = 7,
    Jmp = 8,
    JmpIf = 9,
    JmpNot = 10,
    Ret = 11,
    Throw = 12,

    // ===== Data =====
    Load = 13,
    Cast = 14,
    Cat = 15,
    /// Substring / subarray: `RANGE src dst index length`
    Range = 16,
    Left = 17,
    Right = 18,
    Size = 19,
    Count = 20,

    // ===== Logical =====
    Not = 21,
    And = 22,
    Or = 23,
    Xor = 24,
    Equal = 25,
    Lt = 26,
    Gt = 27,
    Lte = 28,
    Gte = 29,

    // ===== Arithmetic =====
    Inc = 30,
    Dec = 31,
    Sign = 32,
    Negate = 33,
    Abs = 34,
    Add = 35,
    Sub = 36,
    Mul = 37,
    Div = 38,
    Mod = 39,
    Shl = 40,
    Shr = 41,
    Min = 42,
    Max = 43,
    Pow = 44,

    // ===== Context =====
    Ctx = 45,
    Switch = 46,

    // ===== Composite values =====
    Put = 47,
    Get = 48,
    Clear = 49,
    Unpack = 50,
    Pack = 51,

    Debug = 52,
}

impl Opcode {
    pub fn from_u8(byte: u8) -> Option<Self> {
        use Opcode::*;
        const ALL: [Opcode; 53] = [
            Nop, Move, Copy, Push, Pop, Swap, Call, ExtCall, Jmp, JmpIf, JmpNot, Ret, Throw, Load,
            Cast, Cat, Range, Left, Right, Size, Count, Not, And, Or, Xor, Equal, Lt, Gt, Lte, Gte,
            Inc, Dec, Sign, Negate, Abs, Add, Sub, Mul, Div, Mod, Shl, Shr, Min, Max, Pow, Ctx,
            Switch, Put, Get, Clear, Unpack, Pack, Debug,
        ];
        ALL.get(byte as usize).copied()
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Assembly mnemonic
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Move => "MOVE",
            Opcode::Copy => "COPY",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Swap => "SWAP",
            Opcode::Call => "CALL",
            Opcode::ExtCall => "EXTCALL",
            Opcode::Jmp => "JMP",
            Opcode::JmpIf => "JMPIF",
            Opcode::JmpNot => "JMPNOT",
            Opcode::Ret => "RET",
            Opcode::Throw => "THROW",
            Opcode::Load => "LOAD",
            Opcode::Cast => "CAST",
            Opcode::Cat => "CAT",
            Opcode::Range => "RANGE",
            Opcode::Left => "LEFT",
            Opcode::Right => "RIGHT",
            Opcode::Size => "SIZE",
            Opcode::Count => "COUNT",
            Opcode::Not => "NOT",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Equal => "EQUAL",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Lte => "LTE",
            Opcode::Gte => "GTE",
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::Sign => "SIGN",
            Opcode::Negate => "NEGATE",
            Opcode::Abs => "ABS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Shl => "SHL",
            Opcode::Shr => "SHR",
            Opcode::Min => "MIN",
            Opcode::Max => "MAX",
            Opcode::Pow => "POW",
            Opcode::Ctx => "CTX",
            Opcode::Switch => "SWITCH",
            Opcode::Put => "PUT",
            Opcode::Get => "GET",
            Opcode::Clear => "CLEAR",
            Opcode::Unpack => "UNPACK",
            Opcode::Pack => "PACK",
            Opcode::Debug => "DEBUG",
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::JmpIf | Opcode::JmpNot)
    }

    pub fn is_terminator(self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::Ret | Opcode::Throw)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_round_trip() {
        for byte in 0..=52u8 {
            let op = Opcode::from_u8(byte).unwrap();
            assert_eq!(op.to_u8(), byte);
        }
        assert_eq!(Opcode::from_u8(53), None);
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Opcode::ExtCall.to_string(), "EXTCALL");
        assert_eq!(Opcode::JmpNot.name(), "JMPNOT");
        assert!(Opcode::JmpIf.is_jump());
        assert!(Opcode::Ret.is_terminator());
    }
}
