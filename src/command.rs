//! Controller command grammar.
//!
//! Classifies a completed command line (sentinel and terminator already
//! stripped by the framer) into a [`CatCommand`]. The grammar is
//! deliberately permissive: the board's native vocabulary is larger
//! than the set of commands this layer understands, so anything
//! unrecognized is classified as a pass-through rather than rejected.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map, value, verify};
use nom::sequence::preceded;
use nom::IResult;

/// Which VFO slot a frequency command targets.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Vfo {
    A,
    B,
    /// Whichever slot is currently active per the swap flag.
    Active,
}

/// A classified controller command.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum CatCommand<'a> {
    /// `F<digits>` / `FA<digits>` / `FB<digits>`
    SetFrequency { vfo: Vfo, digits: &'a str },
    /// `FA?` / `FB?` — answered from local VFO state, never forwarded.
    QueryVfo(Vfo),
    /// `B<digits>` — set built-in-test frequency.
    SetBitFrequency(&'a str),
    /// `D<digits>` — set frequency offset; digits forwarded unmodified.
    SetOffset(&'a str),
    /// `E<digits>` — set external/CW frequency.
    SetExtFrequency(&'a str),
    /// `X0` / `X1`
    Transmit(bool),
    /// `SW0` — toggle the A/B swap flag.
    SwapVfo,
    /// `FR0` / `FR1`
    Split(bool),
    /// Single-character tuning step, signed Hz.
    Step(i32),
    /// A query to forward verbatim (`F?`, `W`-style `<x>?` forms, ...).
    Query(&'a str),
    /// Unknown but possibly valid native command; forwarded verbatim.
    Raw(&'a str),
}

/// Classify one completed command line.
///
/// Never fails: the fallback classifications are [`CatCommand::Query`]
/// (second character `?`) and [`CatCommand::Raw`].
pub fn parse_command(line: &str) -> CatCommand<'_> {
    if let Ok((_, cmd)) = classified(line) {
        return cmd;
    }
    if line.as_bytes().get(1) == Some(&b'?') {
        CatCommand::Query(line)
    } else {
        CatCommand::Raw(line)
    }
}

fn classified(i: &str) -> IResult<&str, CatCommand<'_>> {
    all_consuming(alt((
        query_vfo,
        set_frequency,
        value(CatCommand::Transmit(false), tag("X0")),
        value(CatCommand::Transmit(true), tag("X1")),
        value(CatCommand::SwapVfo, tag("SW0")),
        value(CatCommand::Split(false), tag("FR0")),
        value(CatCommand::Split(true), tag("FR1")),
        map(preceded(tag("B"), digit1), CatCommand::SetBitFrequency),
        map(preceded(tag("D"), digit1), CatCommand::SetOffset),
        map(preceded(tag("E"), digit1), CatCommand::SetExtFrequency),
        step,
    )))(i)
}

fn query_vfo(i: &str) -> IResult<&str, CatCommand<'_>> {
    alt((
        value(CatCommand::QueryVfo(Vfo::A), tag("FA?")),
        value(CatCommand::QueryVfo(Vfo::B), tag("FB?")),
    ))(i)
}

fn set_frequency(i: &str) -> IResult<&str, CatCommand<'_>> {
    alt((
        map(preceded(tag("FA"), digit1), |digits| CatCommand::SetFrequency {
            vfo: Vfo::A,
            digits,
        }),
        map(preceded(tag("FB"), digit1), |digits| CatCommand::SetFrequency {
            vfo: Vfo::B,
            digits,
        }),
        map(preceded(tag("F"), digit1), |digits| CatCommand::SetFrequency {
            vfo: Vfo::Active,
            digits,
        }),
    ))(i)
}

/// Tuning steps: `,`/`.` are 10 Hz, `<`/`>` are 100 Hz, `K`/`L` are
/// 1000 Hz, down/up respectively.
fn step(i: &str) -> IResult<&str, CatCommand<'_>> {
    map(
        verify(nom::character::complete::anychar, |c: &char| {
            matches!(*c, ',' | '.' | '<' | '>' | 'K' | 'L')
        }),
        |c| {
            CatCommand::Step(match c {
                ',' => -10,
                '.' => 10,
                '<' => -100,
                '>' => 100,
                'K' => -1000,
                _ => 1000, // 'L'
            })
        },
    )(i)
}
