use super::cursor::{WireReader, WireWriter};
use super::header::{Flags, Header, HEADER_LEN};
use super::question::Question;
use super::record::ResourceRecord;
use crate::dns_record::{RecordType, ResponseCode};
use crate::errors::{DomainError, MessageSection};

/// A complete DNS message.
///
/// After [`decode_message`] each header count equals the length of its
/// section. [`encode_message`] writes the counts from the section lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub nameservers: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Single-question query message.
    pub fn query(
        id: u16,
        name: impl Into<String>,
        record_type: RecordType,
        recursion_desired: bool,
    ) -> Self {
        Self {
            header: Header {
                id,
                flags: Flags {
                    recursion_desired,
                    ..Flags::default()
                },
                question_count: 1,
                ..Header::default()
            },
            questions: vec![Question::new(name, record_type)],
            ..Self::default()
        }
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.flags.rcode()
    }

    pub fn is_truncated(&self) -> bool {
        self.header.flags.truncated
    }

    /// Resets every header count to the length of its section.
    pub fn sync_counts(&mut self) {
        self.header.question_count = self.questions.len().min(u16::MAX as usize) as u16;
        self.header.answer_count = self.answers.len().min(u16::MAX as usize) as u16;
        self.header.authority_count = self.nameservers.len().min(u16::MAX as usize) as u16;
        self.header.additional_count = self.additionals.len().min(u16::MAX as usize) as u16;
    }

    pub fn answers_of_type(
        &self,
        record_type: RecordType,
    ) -> impl Iterator<Item = &ResourceRecord> + '_ {
        self.answers
            .iter()
            .filter(move |record| record.is_type(record_type))
    }
}

pub fn decode_message(bytes: &[u8]) -> Result<Message, DomainError> {
    let mut reader = WireReader::new(bytes);
    let header = Header::decode(&mut reader)?;

    // A question is at least 5 bytes (root name, type, class).
    let mut questions =
        Vec::with_capacity((header.question_count as usize).min(reader.remaining() / 5));
    for index in 0..header.question_count {
        let question = Question::decode(&mut reader)
            .map_err(|e| e.in_section(MessageSection::Question, &format!("#{}", index)))?;
        questions.push(question);
    }

    let answers = decode_records(&mut reader, header.answer_count, MessageSection::Answer)?;
    let nameservers =
        decode_records(&mut reader, header.authority_count, MessageSection::Authority)?;
    let additionals =
        decode_records(&mut reader, header.additional_count, MessageSection::Additional)?;

    Ok(Message {
        header,
        questions,
        answers,
        nameservers,
        additionals,
    })
}

fn decode_records(
    reader: &mut WireReader<'_>,
    count: u16,
    section: MessageSection,
) -> Result<Vec<ResourceRecord>, DomainError> {
    // Each record needs at least 11 bytes; don't let a lying count
    // pre-allocate more than the buffer could hold.
    let capacity = (count as usize).min(reader.remaining() / 11);
    let mut records = Vec::with_capacity(capacity);
    for index in 0..count {
        let record = ResourceRecord::decode(reader)
            .map_err(|e| e.in_section(section, &format!("record #{}", index)))?;
        records.push(record);
    }
    Ok(records)
}

pub fn encode_message(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut writer = WireWriter::with_capacity(512);

    let mut header = message.header;
    header.question_count = section_count(message.questions.len(), MessageSection::Question)?;
    header.answer_count = section_count(message.answers.len(), MessageSection::Answer)?;
    header.authority_count = section_count(message.nameservers.len(), MessageSection::Authority)?;
    header.additional_count =
        section_count(message.additionals.len(), MessageSection::Additional)?;
    header.encode(&mut writer);
    debug_assert_eq!(writer.len(), HEADER_LEN);

    for (index, question) in message.questions.iter().enumerate() {
        question
            .encode(&mut writer)
            .map_err(|e| e.in_section(MessageSection::Question, &format!("#{}", index)))?;
    }

    for (records, section) in [
        (&message.answers, MessageSection::Answer),
        (&message.nameservers, MessageSection::Authority),
        (&message.additionals, MessageSection::Additional),
    ] {
        for (index, record) in records.iter().enumerate() {
            record
                .encode(&mut writer)
                .map_err(|e| e.in_section(section, &format!("record #{}", index)))?;
        }
    }

    Ok(writer.into_bytes())
}

fn section_count(len: usize, section: MessageSection) -> Result<u16, DomainError> {
    u16::try_from(len).map_err(|_| DomainError::InvalidMessage {
        section,
        reason: format!("{} entries do not fit in a 16-bit count", len),
    })
}
