//! Textual syntax of formulas.
//!
//! Formulas print in the usual LTL/PSL notation (`G(a -> Fb)`,
//! `{a;b[*]}<>-> c`, `((!b)[*];b)[+]`). Parentheses are only added where
//! precedence requires them.
//!
//! [`Display`](std::fmt::Display) gives the plain text; [`PrettyFormula`]
//! adds colored rendering for terminals.
use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{formula::Formula, op::Op, store::UNBOUNDED};

/// Lexical category of each piece of a printed formula.
///
/// Renderers map categories to colors; plain rendering ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// `{`, `}` and repetition suffixes such as `[*2..3]`.
    Bracket,
    /// Parenthesis at the given nesting depth.
    Paren(u8),
    /// Temporal operators.
    Temporal,
    /// Boolean and SERE connectives.
    Connective,
    /// Atomic propositions.
    Prop,
    /// `0`, `1` and `[*0]`.
    Constant,
}

/// Colors cycled through by nested parentheses.
const PAREN_COLORS: [Color; 4] = [Color::Cyan, Color::Yellow, Color::Magenta, Color::Green];

/// Width used when no terminal is attached.
const DEFAULT_WIDTH: usize = 80;

impl From<Style> for ColorSpec {
    fn from(style: Style) -> Self {
        let mut spec = ColorSpec::new();
        match style {
            Style::Bracket => spec.set_fg(Some(Color::Blue)),
            Style::Paren(depth) => spec
                .set_fg(Some(PAREN_COLORS[depth as usize % PAREN_COLORS.len()]))
                .set_dimmed(true),
            Style::Temporal => spec.set_fg(Some(Color::Blue)).set_bold(true),
            Style::Connective => spec.set_fg(Some(Color::Red)),
            Style::Prop => spec.set_fg(Some(Color::Green)),
            Style::Constant => spec.set_fg(Some(Color::Magenta)).set_italic(true),
        };
        spec
    }
}

fn styled(style: Style, s: &'static str) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(style)
}

fn punct<S: Into<String>>(s: S) -> RcDoc<'static, Style> {
    RcDoc::as_string(s.into()).annotate(Style::Bracket)
}

#[inline]
fn lparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

fn kw(s: &'static str) -> RcDoc<'static, Style> {
    styled(Style::Temporal, s)
}

fn op(s: &'static str) -> RcDoc<'static, Style> {
    styled(Style::Connective, s)
}

/// Names that can be printed without quotes.
fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some('a'..='z' | '_'))
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !matches!(name, "true" | "false" | "xor")
}

fn ident(name: &str) -> RcDoc<'static, Style> {
    let text = if is_bare_name(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\\\""))
    };
    RcDoc::as_string(text).annotate(Style::Prop)
}

fn calculate_precedence(o: Op) -> u8 {
    use Op::*;

    match o {
        EConcat | EConcatMarked | UConcat => 1,
        Implies | Equiv => 2,
        Xor => 3,
        Or | OrRat => 4,
        And | AndRat | AndNLM => 5,
        Concat | Fusion => 6,
        U | R | W | M => 7,
        Not | X | F | G => 8,
        Star | FStar => 9,
        False | True | EmptyWord | Ap | Closure | NegClosure | NegClosureMarked => 255,
    }
}

#[inline]
fn requires_parens(current: Op, parent: Op) -> bool {
    let current_prec = calculate_precedence(current);
    let parent_prec = calculate_precedence(parent);
    if current_prec == 255 {
        return false;
    }
    if parent.is_binary() {
        current_prec <= parent_prec
    } else if parent.is_nary() {
        current_prec < parent_prec || (current_prec == parent_prec && current != parent)
    } else {
        current_prec < parent_prec
    }
}

#[inline]
fn to_doc_parenthesized_with_depth(f: &Formula, parent: Op, depth: u8) -> RcDoc<'static, Style> {
    if requires_parens(f.op(), parent) {
        lparen(depth)
            .append(to_doc_with_depth(f, depth.saturating_add(1)))
            .append(rparen(depth))
            .group()
    } else {
        to_doc_with_depth(f, depth)
    }
}

fn braced(f: &Formula, depth: u8) -> RcDoc<'static, Style> {
    punct("{")
        .append(to_doc_with_depth(f, depth))
        .append(punct("}"))
}

fn repetition_suffix(fusion: bool, min: u8, max: u8) -> String {
    let colon = if fusion { ":" } else { "" };
    match (min, max) {
        (0, UNBOUNDED) => format!("[{colon}*]"),
        (1, UNBOUNDED) => format!("[{colon}+]"),
        (i, UNBOUNDED) => format!("[{colon}*{i}..]"),
        (i, j) if i == j => format!("[{colon}*{i}]"),
        (i, j) => format!("[{colon}*{i}..{j}]"),
    }
}

fn infix(o: Op) -> RcDoc<'static, Style> {
    match o {
        Op::Xor => RcDoc::space().append(op("xor")).append(RcDoc::space()),
        Op::Implies => RcDoc::space().append(op("->")).append(RcDoc::space()),
        Op::Equiv => RcDoc::space().append(op("<->")).append(RcDoc::space()),
        Op::U => RcDoc::space().append(kw("U")).append(RcDoc::space()),
        Op::R => RcDoc::space().append(kw("R")).append(RcDoc::space()),
        Op::W => RcDoc::space().append(kw("W")).append(RcDoc::space()),
        Op::M => RcDoc::space().append(kw("M")).append(RcDoc::space()),
        Op::EConcat => op("<>->").append(RcDoc::space()),
        Op::EConcatMarked => op("<>+>").append(RcDoc::space()),
        Op::UConcat => op("[]->").append(RcDoc::space()),
        Op::Or | Op::OrRat => RcDoc::space().append(op("|")).append(RcDoc::space()),
        Op::And | Op::AndNLM => RcDoc::space().append(op("&")).append(RcDoc::space()),
        Op::AndRat => RcDoc::space().append(op("&&")).append(RcDoc::space()),
        Op::Concat => op(";"),
        Op::Fusion => op(":"),
        _ => unreachable!(),
    }
}

/// Whether a prefix operator can be glued to its operand without a space.
fn glues(child: &Formula) -> bool {
    match child.op() {
        Op::Ap => child.ap_name().is_some_and(|n| n.len() == 1 || !is_bare_name(n)),
        _ => true,
    }
}

/// Depth-aware variant that colors parentheses by nesting level.
fn to_doc_with_depth(f: &Formula, depth: u8) -> RcDoc<'static, Style> {
    match f.op() {
        Op::False => styled(Style::Constant, "0"),
        Op::True => styled(Style::Constant, "1"),
        Op::EmptyWord => styled(Style::Constant, "[*0]"),
        Op::Ap => ident(f.ap_name().unwrap_or_default()),
        Op::Not | Op::X | Op::F | Op::G => {
            let head = match f.op() {
                Op::Not => op("!"),
                Op::X => kw("X"),
                Op::F => kw("F"),
                _ => kw("G"),
            };
            let child = f.nth(0);
            let sep = if f.is(Op::Not) || requires_parens(child.op(), f.op()) || glues(child) {
                RcDoc::nil()
            } else {
                RcDoc::space()
            };
            head.append(sep)
                .append(to_doc_parenthesized_with_depth(child, f.op(), depth))
                .group()
        }
        Op::Closure => braced(f.nth(0), depth),
        Op::NegClosure | Op::NegClosureMarked => op("!").append(braced(f.nth(0), depth)),
        Op::EConcat | Op::EConcatMarked | Op::UConcat => braced(f.nth(0), depth)
            .append(infix(f.op()))
            .append(to_doc_parenthesized_with_depth(f.nth(1), f.op(), depth))
            .group(),
        Op::Xor | Op::Implies | Op::Equiv | Op::U | Op::R | Op::W | Op::M => {
            to_doc_parenthesized_with_depth(f.nth(0), f.op(), depth)
                .append(infix(f.op()))
                .append(to_doc_parenthesized_with_depth(f.nth(1), f.op(), depth))
                .group()
        }
        Op::Or | Op::OrRat | Op::And | Op::AndRat | Op::AndNLM | Op::Concat | Op::Fusion => {
            RcDoc::intersperse(
                f.children()
                    .iter()
                    .map(|c| to_doc_parenthesized_with_depth(c, f.op(), depth)),
                infix(f.op()),
            )
            .group()
        }
        Op::Star | Op::FStar => to_doc_parenthesized_with_depth(f.nth(0), f.op(), depth)
            .append(punct(repetition_suffix(f.is(Op::FStar), f.min(), f.max()))),
    }
}

/// Termcolor sink for annotated documents.
///
/// Annotations nest, so popping one restores the color of the enclosing one.
struct Colored<'w, W: WriteColor> {
    out: &'w mut W,
    styles: Vec<Style>,
}

impl<'w, W: WriteColor> Colored<'w, W> {
    fn new(out: &'w mut W) -> Self {
        Self {
            out,
            styles: Vec::new(),
        }
    }
}

impl<'a, W: WriteColor> RenderAnnotated<'a, Style> for Colored<'_, W> {
    fn push_annotation(&mut self, style: &'a Style) -> io::Result<()> {
        self.styles.push(*style);
        self.out.set_color(&ColorSpec::from(*style))
    }

    fn pop_annotation(&mut self) -> io::Result<()> {
        self.styles.pop();
        match self.styles.last() {
            Some(&style) => self.out.set_color(&ColorSpec::from(style)),
            None => self.out.reset(),
        }
    }
}

impl<W: WriteColor> pretty::Render for Colored<'_, W> {
    type Error = io::Error;

    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write(s.as_bytes())
    }

    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }

    fn fail_doc(&self) -> Self::Error {
        io::Error::other("cannot render formula")
    }
}

/// Printing helpers on top of [`Display`](std::fmt::Display).
///
/// `Display` always lays formulas out on an 80 column line without colors.
pub trait PrettyFormula {
    /// Annotated document, for embedding into larger documents.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Write the formula to `out`, colored when `out` supports it.
    fn pretty_render_to<W: WriteColor>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Write the formula and a newline to stdout, sized to the terminal.
    fn pretty_print(&self) -> io::Result<()>;

    fn pretty_string(&self) -> String;
}

impl PrettyFormula for Formula {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self, 0)
    }

    fn pretty_render_to<W: WriteColor>(&self, width: usize, out: &mut W) -> io::Result<()> {
        self.pretty_doc().render_raw(width, &mut Colored::new(out))
    }

    fn pretty_print(&self) -> io::Result<()> {
        let width = term_size::dimensions_stdout().map_or(DEFAULT_WIDTH, |(w, _)| w);
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(width, &mut stdout)?;
        writeln!(stdout)
    }

    fn pretty_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut w = FmtWrite::new(f);
        self.pretty_doc().render_raw(DEFAULT_WIDTH, &mut w)
    }
}
