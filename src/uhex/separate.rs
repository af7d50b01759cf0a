//! Separation of Universal Hex documents into their Intel Hex images.
//!
//! # Architecture
//!
//! Records are fed one at a time through a cursor with two states, each
//! represented by a token. `Between` covers records outside any block,
//! `Within` those inside a block owned by a board. Calling a token's
//! `advance` method consumes the next record and returns the successor state
//! token.
//!
//! Records are collected per board in a `Boards` accumulator that outlives
//! the cursor, since the blocks of one board may be spread over the whole
//! document. The accumulator also tracks the address record currently in
//! effect, so that a board resuming after blocks of other boards is given the
//! address context its records were written against.

use alloc::{
    borrow::Cow,
    string::{String, ToString},
    vec::Vec,
};

use either::Either::{self, Left, Right};
use tracing::{debug, warn};

use crate::{
    error::{Error, StateError},
    ihex::{
        RecordType,
        record::{EOF_RECORD, get_record_type, parse_record},
        stream::split_into_records,
    },
};

use super::IndividualHex;

/// Split a Universal Hex into the Intel Hex images it holds.
///
/// Images are returned in the order their board first appears. Each ends
/// with an End Of File record and a line ending.
pub fn separate_uhex(uhex: &str) -> Result<Vec<IndividualHex>, Error> {
    let records = split_into_records(uhex);

    if records.is_empty() {
        Err(StateError::Empty)?;
    }

    // Skip the optional opening address record, the next must start a block.
    let first = match get_record_type(records[0]) {
        Ok(RecordType::ExtendedLinearAddress) => records.get(1),
        _ => records.first(),
    };
    if first.map(|r| get_record_type(r)) != Some(Ok(RecordType::BlockStart)) {
        Err(StateError::FormatInvalid)?;
    }

    let mut boards = Boards::default();
    let mut cursor = Left(Between(()));

    for record in records {
        cursor = match cursor {
            Left(state) => state.advance(record, &mut boards)?,
            Right(state) => state.advance(record, &mut boards)?,
        };
    }

    Ok(boards.finish())
}

/// State token for records outside any block.
#[derive(Debug)]
struct Between(());

impl Between {
    /// Transition to another state by consuming a record found outside any
    /// block.
    ///
    /// Address records become the address in effect for the next block.
    /// Other content is dropped, as no board owns it.
    fn advance<'a>(
        self,
        record: &'a str,
        boards: &mut Boards<'a>,
    ) -> Result<Either<Between, Within>, Error> {
        let record_type = get_record_type(record)?;

        if record_type == RecordType::BlockStart {
            return Ok(Right(boards.open(record)?));
        }

        parse_record(record)?;

        match record_type {
            RecordType::ExtendedLinearAddress | RecordType::ExtendedSegmentAddress => {
                boards.address = Some(record);
            }
            RecordType::EndOfFile | RecordType::BlockEnd => {}
            _ => warn!(record, "Dropping record found outside any block"),
        }

        Ok(Left(self))
    }
}

/// State token for records inside a block owned by a board.
#[derive(Debug)]
struct Within {
    board: usize,
}

impl Within {
    /// Transition to another state by consuming a record found inside a block.
    fn advance<'a>(
        self,
        record: &'a str,
        boards: &mut Boards<'a>,
    ) -> Result<Either<Between, Within>, Error> {
        let record_type = get_record_type(record)?;

        if record_type == RecordType::BlockStart {
            // A block left open is implicitly closed by the next one.
            return Ok(Right(boards.open(record)?));
        }

        let parsed = parse_record(record)?;
        let board = &mut boards.hexes[self.board];

        match record_type {
            RecordType::BlockEnd => return Ok(Left(Between(()))),
            RecordType::ExtendedLinearAddress | RecordType::ExtendedSegmentAddress => {
                boards.address = Some(record);
                board.set_address(record);
            }
            RecordType::Data | RecordType::StartSegmentAddress | RecordType::StartLinearAddress => {
                board.records.push(Cow::Borrowed(record));
            }
            RecordType::CustomData => {
                let record = parsed.retyped(RecordType::Data).to_string();
                board.records.push(Cow::Owned(record));
            }
            RecordType::PaddedData
            | RecordType::OtherData
            | RecordType::EndOfFile
            | RecordType::BlockStart => {}
        }

        Ok(Right(self))
    }
}

/// Records collected for each board.
#[derive(Debug, Default)]
struct Boards<'a> {
    /// Address record currently in effect.
    address: Option<&'a str>,
    /// Boards in order of first appearance.
    hexes: Vec<BoardHex<'a>>,
}

#[derive(Debug)]
struct BoardHex<'a> {
    board_id: u16,
    records: Vec<Cow<'a, str>>,
    /// Last address record added to `records`.
    address: Option<&'a str>,
}

impl<'a> BoardHex<'a> {
    fn set_address(&mut self, record: &'a str) {
        if self.address != Some(record) {
            self.records.push(Cow::Borrowed(record));
            self.address = Some(record);
        }
    }
}

impl<'a> Boards<'a> {
    /// Open a block for the board named by a Block Start record.
    fn open(&mut self, record: &'a str) -> Result<Within, StateError> {
        let board_id = parse_record(record)
            .ok()
            .and_then(|r| r.board_id())
            .ok_or_else(|| StateError::BlockStart(record.to_string()))?;

        let board = match self.hexes.iter().position(|h| h.board_id == board_id) {
            Some(board) => board,
            None => {
                debug!(board_id, "Found new board");
                self.hexes.push(BoardHex {
                    board_id,
                    records: Vec::new(),
                    address: None,
                });
                self.hexes.len() - 1
            }
        };

        if let Some(address) = self.address {
            self.hexes[board].set_address(address);
        }

        Ok(Within { board })
    }

    /// Join the records of each board into an Intel Hex document.
    fn finish(self) -> Vec<IndividualHex> {
        self.hexes
            .into_iter()
            .map(|board| {
                let mut hex = String::new();
                for record in board.records.iter().map(|r| &**r).chain([EOF_RECORD]) {
                    hex.push_str(record);
                    hex.push('\n');
                }

                IndividualHex {
                    hex,
                    board_id: board.board_id,
                }
            })
            .collect()
    }
}
