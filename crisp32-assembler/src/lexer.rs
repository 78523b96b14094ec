//! Lexer for CRISP-32 assembly language

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Mnemonics and label references
    Identifier(String),

    // Registers
    Register(String),

    // Literals
    Number(i64),    // Decimal: 123, -456
    HexNumber(u32), // Hex: 0x1234

    // Symbols
    Comma, // ,
    Colon, // :

    // Special
    Newline,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(s) => write!(f, "identifier({})", s),
            Token::Register(r) => write!(f, "register({})", r),
            Token::Number(n) => write!(f, "number({})", n),
            Token::HexNumber(n) => write!(f, "hex(0x{:x})", n),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Newline => write!(f, "\\n"),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        // Skip until end of line
        while let Some(ch) = self.current() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_number(&mut self) -> Result<Token, String> {
        let is_negative = self.current() == Some('-');
        if is_negative {
            self.advance();
        }

        // Hex literal (0x prefix)
        if self.current() == Some('0') && matches!(self.peek(1), Some('x') | Some('X')) {
            self.advance(); // '0'
            self.advance(); // 'x'
            let hex_str = self.read_hex_digits();
            let value = u32::from_str_radix(&hex_str, 16)
                .map_err(|e| format!("invalid hex number at line {}: {}", self.line, e))?;
            return if is_negative {
                Ok(Token::Number(-(value as i64)))
            } else {
                Ok(Token::HexNumber(value))
            };
        }

        // Decimal number
        let mut num_str = String::new();
        if is_negative {
            num_str.push('-');
        }
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if num_str.is_empty() || num_str == "-" {
            return Err(format!("invalid number at line {}", self.line));
        }

        num_str
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|e| format!("invalid number at line {}: {}", self.line, e))
    }

    fn read_hex_digits(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_hexdigit() {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    pub fn next_token(&mut self) -> Result<Token, String> {
        self.skip_whitespace();

        match self.current() {
            None => Ok(Token::Eof),
            Some('\n') => {
                self.advance();
                Ok(Token::Newline)
            }
            Some('#') | Some(';') => {
                self.skip_comment();
                self.next_token()
            }
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some(':') => {
                self.advance();
                Ok(Token::Colon)
            }
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                if is_register(&ident) {
                    Ok(Token::Register(ident))
                } else {
                    Ok(Token::Identifier(ident))
                }
            }
            Some(ch) => Err(format!(
                "unexpected character '{}' at line {}, col {}",
                ch, self.line, self.col
            )),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token, Token::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// Check if an identifier names a register
fn is_register(s: &str) -> bool {
    let lower = s.to_lowercase();
    matches!(
        lower.as_str(),
        // Numbered registers
        "r0" | "r1" | "r2" | "r3" | "r4" | "r5" | "r6" | "r7" |
        "r8" | "r9" | "r10" | "r11" | "r12" | "r13" | "r14" | "r15" |
        "r16" | "r17" | "r18" | "r19" | "r20" | "r21" | "r22" | "r23" |
        "r24" | "r25" | "r26" | "r27" | "r28" | "r29" | "r30" | "r31" |
        // ABI names
        "zero" | "at" | "v0" | "v1" |
        "a0" | "a1" | "a2" | "a3" |
        "t0" | "t1" | "t2" | "t3" | "t4" | "t5" | "t6" | "t7" | "t8" | "t9" |
        "s0" | "s1" | "s2" | "s3" | "s4" | "s5" | "s6" | "s7" |
        "k0" | "k1" | "gp" | "sp" | "fp" | "ra"
    )
}
