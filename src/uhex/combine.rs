//! Creation of Universal Hex documents.

use alloc::{borrow::Cow, string::String, vec::Vec};

use tracing::{debug, trace};

use crate::{
    error::{Error, StateError},
    ihex::{
        RecordType,
        record::{
            EOF_RECORD, MIN_RECORD_STR_LEN, block_end_record, block_start_record,
            convert_ext_seg_to_lin_address, convert_record_to, ext_lin_address_record,
            get_record_type, padded_data_record, parse_record,
        },
        stream::{find_data_field_length, split_into_records},
    },
};

use super::{
    BLOCK_SIZE, IndividualHex, Layout, is_uhex,
    makecode::{has_trailing_metadata, is_end_of_file, is_makecode_v1_records},
    uses_custom_data,
};

/// Line length of a padding record with an empty data field, including its
/// line ending.
const EMPTY_PADDING_LEN: usize = MIN_RECORD_STR_LEN + 1;

/// Combine Intel Hex images into a Universal Hex.
///
/// Images appear in the output in the order given. An empty slice produces an
/// empty document.
///
/// Fails if an image is already a Universal Hex, holds MakeCode V1 metadata,
/// or has an End Of File record before its last record.
pub fn create_uhex(hexes: &[IndividualHex], layout: Layout) -> Result<String, Error> {
    let images = hexes
        .iter()
        .map(Image::new)
        .collect::<Result<Vec<_>, _>>()?;

    if images.is_empty() {
        return Ok(String::new());
    }

    debug!(images = images.len(), ?layout, "Creating Universal Hex");

    let mut uhex = String::new();

    match layout {
        Layout::Sections => {
            for image in &images {
                uhex.push_str(&image.section()?);
            }
        }
        Layout::Blocks => {
            let mut queues = images
                .iter()
                .map(|image| image.blocks().map(Vec::into_iter))
                .collect::<Result<Vec<_>, _>>()?;

            // Take one block from each image in turn, until all run dry.
            let mut pending = true;
            while pending {
                pending = false;
                for queue in &mut queues {
                    if let Some(block) = queue.next() {
                        uhex.push_str(&block);
                        pending = true;
                    }
                }
            }
        }
    }

    uhex.push_str(EOF_RECORD);
    uhex.push('\n');

    Ok(uhex)
}

/// A validated image, stripped of its End Of File record.
struct Image<'a> {
    board_id: u16,
    records: Vec<&'a str>,
    data_field_length: usize,
}

impl<'a> Image<'a> {
    fn new(hex: &'a IndividualHex) -> Result<Self, Error> {
        let board_id = hex.board_id;

        if is_uhex(&hex.hex) {
            Err(StateError::AlreadyUniversal(board_id))?;
        }

        let mut records = split_into_records(&hex.hex);
        for record in &records {
            parse_record(record)?;
        }

        if let Some(eof) = records.iter().position(|r| is_end_of_file(r)) {
            if eof + 1 != records.len() {
                if has_trailing_metadata(&records[eof + 1..]) {
                    Err(StateError::MakeCode(board_id))?;
                }

                Err(StateError::EndOfFile {
                    position: eof + 1,
                    count: records.len(),
                    board_id,
                })?;
            }

            if is_makecode_v1_records(&records) {
                Err(StateError::MakeCode(board_id))?;
            }

            records.truncate(eof);
        }

        let data_field_length = find_data_field_length(&hex.hex)?;

        debug!(board_id, records = records.len(), data_field_length, "Read image");

        Ok(Self {
            board_id,
            records,
            data_field_length,
        })
    }

    /// Format the image as a single section.
    fn section(&self) -> Result<String, Error> {
        let mut records = self.records.iter().copied().peekable();

        let address = match records.next_if(|r| is_address_record(r)) {
            Some(record) => address_record(record)?,
            None => Cow::Owned(ext_lin_address_record(0)?),
        };

        let mut section = Chunk::default();
        section.push(&address);
        section.push(&block_start_record(self.board_id));

        for record in records {
            if let Some(record) = self.convert(record)? {
                section.push(&record);
            }
        }

        section.close(self.data_field_length)
    }

    /// Format the image as a sequence of blocks.
    fn blocks(&self) -> Result<Vec<String>, Error> {
        let start = block_start_record(self.board_id);
        let mut address = Cow::Owned(ext_lin_address_record(0)?);
        let mut records = self.records.iter().copied().peekable();
        let mut blocks = Vec::new();

        loop {
            // Avoid repeating an address record right after the Block Start.
            if let Some(record) = records.next_if(|r| is_address_record(r)) {
                address = address_record(record)?;
            }

            let mut block = Chunk::default();
            block.push(&address);
            block.push(&start);

            while let Some(record) = records.next_if(|r| block.len() + r.len() + 1 <= BLOCK_SIZE) {
                if is_address_record(record) {
                    address = address_record(record)?;
                    block.push(&address);
                } else if let Some(record) = self.convert(record)? {
                    block.push(&record);
                }
            }

            blocks.push(block.close(self.data_field_length)?);

            if records.peek().is_none() {
                break;
            }
        }

        trace!(board_id = self.board_id, blocks = blocks.len(), "Cut image into blocks");

        Ok(blocks)
    }

    /// Rewrite a record for the combined document, or drop it.
    fn convert(&self, record: &'a str) -> Result<Option<Cow<'a, str>>, Error> {
        let record = match get_record_type(record)? {
            RecordType::Data if uses_custom_data(self.board_id) => {
                Cow::Owned(convert_record_to(record, RecordType::CustomData)?)
            }
            RecordType::Data => Cow::Borrowed(record),
            RecordType::ExtendedLinearAddress | RecordType::ExtendedSegmentAddress => {
                address_record(record)?
            }
            record_type => {
                trace!(board_id = self.board_id, ?record_type, "Dropping record");
                return Ok(None);
            }
        };

        Ok(Some(record))
    }
}

fn is_address_record(record: &str) -> bool {
    matches!(
        get_record_type(record),
        Ok(RecordType::ExtendedLinearAddress | RecordType::ExtendedSegmentAddress)
    )
}

/// An address record in its Extended Linear Address form.
fn address_record(record: &str) -> Result<Cow<'_, str>, Error> {
    Ok(match get_record_type(record)? {
        RecordType::ExtendedSegmentAddress => Cow::Owned(convert_ext_seg_to_lin_address(record)?),
        _ => Cow::Borrowed(record),
    })
}

/// Text of a section or block under construction.
#[derive(Default)]
struct Chunk {
    text: String,
}

impl Chunk {
    fn push(&mut self, record: &str) {
        self.text.push_str(record);
        self.text.push('\n');
    }

    /// Length of the text, counting the Block End record still to come.
    fn len(&self) -> usize {
        self.text.len() + EMPTY_PADDING_LEN
    }

    /// Pad the text to a multiple of the block size and close it with a Block
    /// End record.
    ///
    /// `capacity` is the data field length of the image, which padding records
    /// do not exceed.
    fn close(mut self, capacity: usize) -> Result<String, Error> {
        let needed = |len: usize| (BLOCK_SIZE - len % BLOCK_SIZE) % BLOCK_SIZE;

        let mut remaining = needed(self.len());
        while remaining > 2 * capacity {
            let padding = ((remaining - EMPTY_PADDING_LEN) / 2).min(capacity);
            self.push(&padded_data_record(padding)?);
            remaining = needed(self.len());
        }

        trace!(padding = remaining / 2, "Closing block");
        self.push(&block_end_record(remaining / 2)?);

        Ok(self.text)
    }
}
