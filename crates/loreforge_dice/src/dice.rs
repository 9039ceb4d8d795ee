//! The dice mini-language.
//!
//! Dice strings follow `[base][+][count]d[sides][M bonus]`, where every
//! number may instead be a `$NAME` variable to be bound to an expression
//! later: `"5"`, `"2d4"`, `"1+2d3"`, `"1d4M7"`, `"$B+$Dd$S"`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use loreforge_foundation::{Error, ErrorKind, Result};

use crate::expression::{EvalContext, Expression};
use crate::random::Random;

/// One number slot in a dice value: a literal or a named variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Term {
    Literal(i32),
    Variable(usize),
}

/// A named variable slot, bindable to an expression.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Variable {
    name: String,
    expr: Option<Expression>,
}

/// A parsed dice value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dice {
    base: Option<Term>,
    count: Option<Term>,
    sides: Option<Term>,
    m_bonus: Option<Term>,
    variables: Vec<Variable>,
}

/// Scanner tokens for dice strings.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Number(i32),
    Variable(String),
    Plus,
    D,
    M,
}

fn scan(source: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            'd' => {
                chars.next();
                tokens.push(Token::D);
            }
            'M' | 'm' => {
                chars.next();
                tokens.push(Token::M);
            }
            '$' => {
                chars.next();
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return None;
                }
                tokens.push(Token::Variable(name));
            }
            '-' | '0'..='9' => {
                let negative = ch == '-';
                if negative {
                    chars.next();
                }
                let mut digits = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() {
                        digits.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: i32 = digits.parse().ok()?;
                tokens.push(Token::Number(if negative { -value } else { value }));
            }
            _ => return None,
        }
    }

    Some(tokens)
}

impl Dice {
    /// Parses a dice string.
    ///
    /// # Errors
    /// Returns [`ErrorKind::InvalidDice`] when the string does not match the
    /// dice grammar.
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = || Error::new(ErrorKind::InvalidDice(source.to_string()));
        let tokens = scan(source).ok_or_else(invalid)?;
        if tokens.is_empty() {
            return Err(invalid());
        }

        let mut dice = Self::default();
        let mut i = 0;

        let mut term = |tok: &Token, dice: &mut Self| -> Option<Term> {
            match tok {
                Token::Number(n) => Some(Term::Literal(*n)),
                Token::Variable(name) => Some(Term::Variable(dice.intern_variable(name))),
                _ => None,
            }
        };

        // Leading term is the base unless a 'd' follows it directly.
        if let Some(tok) = tokens.get(i) {
            if let Some(t) = term(tok, &mut dice) {
                if tokens.get(i + 1) != Some(&Token::D) {
                    dice.base = Some(t);
                    i += 1;
                    if tokens.get(i) == Some(&Token::Plus) {
                        i += 1;
                        // A '+' promises a dice section.
                        if tokens.len() == i {
                            return Err(invalid());
                        }
                    }
                }
            }
        }

        // Dice section: [count]d sides
        if let Some(tok) = tokens.get(i) {
            let count = if *tok == Token::D {
                Some(Term::Literal(1))
            } else if tokens.get(i + 1) == Some(&Token::D) {
                let t = term(tok, &mut dice).ok_or_else(invalid)?;
                i += 1;
                Some(t)
            } else {
                None
            };
            if let Some(count) = count {
                i += 1; // consume 'd'
                let sides_tok = tokens.get(i).ok_or_else(invalid)?;
                let sides = term(sides_tok, &mut dice).ok_or_else(invalid)?;
                i += 1;
                dice.count = Some(count);
                dice.sides = Some(sides);
            }
        }

        // Bonus section: M term
        if tokens.get(i) == Some(&Token::M) {
            i += 1;
            let tok = tokens.get(i).ok_or_else(invalid)?;
            dice.m_bonus = Some(term(tok, &mut dice).ok_or_else(invalid)?);
            i += 1;
        }

        if i != tokens.len() {
            return Err(invalid());
        }
        Ok(dice)
    }

    fn intern_variable(&mut self, name: &str) -> usize {
        if let Some(pos) = self.variables.iter().position(|v| v.name == name) {
            return pos;
        }
        self.variables.push(Variable {
            name: name.to_string(),
            expr: None,
        });
        self.variables.len() - 1
    }

    /// Binds an expression to the named variable.
    ///
    /// The expression is deep-copied into the dice value, so the caller's
    /// expression may be discarded or reused afterwards.
    ///
    /// # Errors
    /// Returns [`ErrorKind::UnboundExpression`] when the dice value carries
    /// no variable of that name.
    pub fn bind_expression(&mut self, name: &str, expr: &Expression) -> Result<()> {
        let slot = self
            .variables
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(|| ErrorKind::UnboundExpression(name.to_string()))?;
        slot.expr = Some(expr.clone());
        Ok(())
    }

    /// Returns true when the dice value carries any `$NAME` variables.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Returns the names of the variables, in order of first appearance.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|v| v.name.as_str())
    }

    fn resolve(&self, term: Option<Term>, ctx: &dyn EvalContext) -> i32 {
        match term {
            None => 0,
            Some(Term::Literal(n)) => n,
            Some(Term::Variable(i)) => self.variables[i]
                .expr
                .as_ref()
                .map_or(0, |e| e.evaluate(ctx)),
        }
    }

    /// Rolls the dice value: base plus `count` rolls of `sides` plus a
    /// uniform bonus in `0..=m_bonus`.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R, ctx: &dyn EvalContext) -> i32 {
        let base = self.resolve(self.base, ctx);
        let count = self.resolve(self.count, ctx);
        let sides = self.resolve(self.sides, ctx);
        let m_bonus = self.resolve(self.m_bonus, ctx);

        let mut total = base;
        if count > 0 && sides > 0 {
            for _ in 0..count {
                total += rng.gen_range(1..=sides);
            }
        }
        if m_bonus > 0 {
            total += rng.gen_range(0..=m_bonus);
        }
        total
    }

    /// Converts to a plain [`Random`] range, when no variables are present.
    #[must_use]
    pub fn to_random(&self) -> Option<Random> {
        let literal = |term: Option<Term>| match term {
            None => Some(0),
            Some(Term::Literal(n)) => Some(n),
            Some(Term::Variable(_)) => None,
        };
        Some(Random {
            base: literal(self.base)?,
            dice: literal(self.count)?,
            sides: literal(self.sides)?,
            m_bonus: literal(self.m_bonus)?,
        })
    }
}
