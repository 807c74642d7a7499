//! TIR (Test IR) parser implementation.

use super::*;
use crate::core::error::FeatureError;

pub fn parse_ir(text: &str) -> FeatureResult<TestIR> {
    let parser = Parser::new(text);
    parser.parse().map_err(|reason| FeatureError::Parse {
        source_name: "<tir>".to_string(),
        reason,
    })
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    ir: TestIR,
    /// First block index of the function being parsed.
    func_block_begin: u32,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            ir: TestIR::new(),
            func_block_begin: 0,
        }
    }

    fn parse(mut self) -> Result<TestIR, String> {
        self.skip_whitespace(true);

        while !self.is_eof() {
            if let Err(e) = self.parse_function() {
                let context_start = self.pos.saturating_sub(20);
                let context_end = (self.pos + 20).min(self.text.len());
                log::debug!("Context: '{}'", self.text.get(context_start..context_end).unwrap_or(""));
                return Err(format!("line {}: {}", self.line, e));
            }
            self.skip_whitespace(true);
        }

        Ok(self.ir)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            if ch == '\n' {
                self.line += 1;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self, skip_newlines: bool) {
        while let Some(ch) = self.current_char() {
            if ch == ';' {
                // Comment runs to end of line; the newline itself is left for the caller.
                while let Some(ch) = self.current_char() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if ch.is_whitespace() {
                if ch == '\n' && !skip_newlines {
                    break;
                }
                self.advance();
            } else {
                break;
            }
        }
    }

    fn try_read(&mut self, ch: char) -> bool {
        self.skip_whitespace(false);
        if self.current_char() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Result<(), String> {
        if !self.try_read(ch) {
            return Err(format!("Expected '{}' but found {:?}", ch, self.current_char()));
        }
        Ok(())
    }

    fn at_line_end(&mut self) -> bool {
        self.skip_whitespace(false);
        matches!(self.current_char(), None | Some('\n'))
    }

    fn read_identifier(&mut self) -> Result<&'a str, String> {
        self.skip_whitespace(false);
        let start = self.pos;

        match self.current_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' => {}
            Some(ch) => return Err(format!("Expected identifier but found '{}'", ch)),
            None => return Err("Expected identifier but found EOF".to_string()),
        }

        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }

        Ok(&self.text[start..self.pos])
    }

    fn read_number(&mut self) -> Result<u32, String> {
        self.skip_whitespace(false);
        let start = self.pos;
        while matches!(self.current_char(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.text[start..self.pos];
        digits
            .parse()
            .map_err(|_| format!("Expected number but found {:?}", self.current_char()))
    }

    /// `%name`, with the sigil stripped.
    fn read_value_name(&mut self) -> Result<&'a str, String> {
        self.expect('%')?;
        self.read_identifier()
    }

    /// `%value`, `^block` or `$imm`, kept verbatim.
    fn read_operand(&mut self) -> Result<String, String> {
        self.skip_whitespace(false);
        match self.current_char() {
            Some('%') => Ok(format!("%{}", self.read_value_name()?)),
            Some('^') => {
                self.advance();
                Ok(format!("^{}", self.read_identifier()?))
            }
            Some('$') => {
                self.advance();
                Ok(format!("${}", self.read_number()?))
            }
            other => Err(format!("Expected operand but found {:?}", other)),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<String>, String> {
        let mut args = Vec::new();
        if !self.try_read('(') {
            return Ok(args);
        }
        if self.try_read(')') {
            return Ok(args);
        }
        loop {
            args.push(self.read_value_name()?.to_string());
            if self.try_read(')') {
                break;
            }
            self.expect(',')?;
        }
        Ok(args)
    }

    fn parse_function(&mut self) -> Result<(), String> {
        let first = self.read_identifier()?;
        let declaration = first == "declare";
        let name = if declaration { self.read_identifier()? } else { first };
        let args = self.parse_args()?;

        let block_begin_idx = self.ir.blocks.len() as u32;
        self.func_block_begin = block_begin_idx;
        if !declaration {
            self.skip_whitespace(true);
            self.expect('{')?;
            self.parse_body()?;
        }
        let block_end_idx = self.ir.blocks.len() as u32;

        self.ir.functions.push(Function {
            name: name.to_string(),
            declaration,
            args,
            block_begin_idx,
            block_end_idx,
        });
        Ok(())
    }

    fn parse_body(&mut self) -> Result<(), String> {
        loop {
            self.skip_whitespace(true);
            match self.current_char() {
                None => return Err("Unterminated function body".to_string()),
                Some('}') => {
                    self.advance();
                    self.close_block();
                    return Ok(());
                }
                Some('%') => {
                    let result = self.read_value_name()?.to_string();
                    self.expect('=')?;
                    let mnemonic = self.read_identifier()?;
                    self.parse_instruction(Some(result), mnemonic)?;
                }
                Some(_) => {
                    let ident = self.read_identifier()?;
                    if self.try_read(':') {
                        self.close_block();
                        self.ir.blocks.push(Block {
                            name: ident.to_string(),
                            inst_begin_idx: self.ir.insts.len() as u32,
                            inst_end_idx: self.ir.insts.len() as u32,
                        });
                    } else {
                        self.parse_instruction(None, ident)?;
                    }
                }
            }
        }
    }

    fn close_block(&mut self) {
        let end = self.ir.insts.len() as u32;
        if let Some(block) = self.ir.blocks.last_mut() {
            block.inst_end_idx = end;
        }
    }

    fn parse_instruction(&mut self, result: Option<String>, mnemonic: &str) -> Result<(), String> {
        if self.ir.blocks.len() as u32 == self.func_block_begin {
            return Err(format!("Instruction '{}' outside of a block", mnemonic));
        }

        let mut address_space = None;
        self.skip_whitespace(false);
        if self.text[self.pos..].starts_with("addrspace") {
            if mnemonic != "load" && mnemonic != "store" {
                return Err(format!("addrspace is only valid on load/store, not '{}'", mnemonic));
            }
            self.read_identifier()?;
            self.expect('(')?;
            address_space = Some(self.read_number()?);
            self.expect(')')?;
        }

        let mut operands = Vec::new();
        if !self.at_line_end() {
            loop {
                operands.push(self.read_operand()?);
                if !self.try_read(',') {
                    break;
                }
            }
        }
        if !self.at_line_end() {
            return Err(format!("Unexpected {:?} after instruction", self.current_char()));
        }

        self.ir.insts.push(Inst {
            result,
            mnemonic: mnemonic.to_string(),
            address_space,
            operands,
        });
        Ok(())
    }
}
