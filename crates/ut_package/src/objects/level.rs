use binrw::BinRead;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compact::{counted, CompactIndex, TArray};
use crate::table::ObjectRef;
use crate::text::{sized_text, sized_text_list, RawText};

/// Text blocks every level carries
pub const NUM_LEVEL_TEXT_BLOCKS: usize = 16;

/// The actor list of a level
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct LevelBase {
    pub actor_count: u32,
    /// The count is stored twice; the copy is skipped
    #[br(pad_before = 4, parse_with = counted, args(u64::from(actor_count), ()))]
    pub actors: Vec<ObjectRef>,
    pub url: LevelUrl,
}

/// The address the level was saved under
#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct LevelUrl {
    #[br(parse_with = sized_text)]
    pub protocol: RawText,
    #[br(parse_with = sized_text)]
    pub host: RawText,
    #[br(parse_with = sized_text)]
    pub map: RawText,
    #[br(parse_with = sized_text_list)]
    pub options: Vec<RawText>,
    #[br(parse_with = sized_text)]
    pub portal: RawText,
    pub port: u32,
    #[br(map = |value: u32| value > 0)]
    pub valid: bool,
}

#[derive(BinRead, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little, import(version: u16))]
pub struct Level {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub base: LevelBase,
    /// The level's BSP [`crate::objects::Model`]
    pub model: ObjectRef,
    pub reach_specs: TArray<ReachSpec>,
    pub approx_time: f32,
    pub first_deleted: CompactIndex,
    pub text_blocks: [ObjectRef; NUM_LEVEL_TEXT_BLOCKS],
    #[br(if(version > 62))]
    pub travel_info: Option<TArray<TravelEntry>>,
}

/// A path between two navigation points
#[derive(BinRead, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct ReachSpec {
    pub distance: u32,
    pub start: ObjectRef,
    pub end: ObjectRef,
    pub collision_radius: u32,
    pub collision_height: u32,
    pub reach_flags: u32,
    #[br(map = |value: u8| value > 0)]
    pub pruned: bool,
}

#[derive(BinRead, Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct TravelEntry {
    #[br(parse_with = sized_text)]
    pub key: RawText,
    #[br(parse_with = sized_text)]
    pub value: RawText,
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use pretty_assertions::assert_eq;

    use crate::objects::level::{Level, LevelBase};
    use crate::table::ObjectRef;

    #[rustfmt::skip]
    const LEVEL_BASE: [u8; 36] = [
        0x02, 0x00, 0x00, 0x00, // actor count
        0x02, 0x00, 0x00, 0x00, // actor count again
        0x00, 0x03,             // actors
        0x01, 0x00,             // protocol
        0x01, 0x00,             // host
        0x05, b'D', b'M', b'-', b'X', 0x00, // map
        0x01,                   // options
        0x05, b'N', b'a', b'm', b'e', 0x00,
        0x00,                   // portal
        0x07, 0x1E, 0x00, 0x00, // port
        0x01, 0x00, 0x00, 0x00, // valid
    ];

    #[test]
    fn read_level_base() -> binrw::BinResult<()> {
        let mut input = Cursor::new(LEVEL_BASE);
        let level = LevelBase::read_le(&mut input)?;

        assert_eq!(level.actors, vec![ObjectRef::NULL, ObjectRef(3)]);
        assert_eq!(level.url.map.to_string_lossy(), "DM-X");
        assert!(level.url.protocol.is_empty());
        assert_eq!(level.url.options.len(), 1);
        assert_eq!(level.url.options[0].to_string_lossy(), "Name");
        assert_eq!(level.url.port, 7687);
        assert!(level.url.valid);
        assert_eq!(input.position(), 36);

        Ok(())
    }

    fn level_bytes(version: u16) -> Vec<u8> {
        let mut input = LEVEL_BASE.to_vec();
        #[rustfmt::skip]
        let tail = [
            0x04,                   // model
            0x01,                   // reach specs
            0x10, 0x00, 0x00, 0x00, // distance
            0x01, 0x02,             // start, end
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00, // flags
            0x01,                   // pruned
            0x00, 0x00, 0x00, 0x00, // approx time
            0x00,                   // first deleted
        ];
        input.extend(tail);
        input.extend([0x00; 15]);
        input.extend([0x81]);
        if version > 62 {
            input.extend([0x01, 0x02, b'A', 0x00, 0x02, b'B', 0x00]);
        }
        input
    }

    #[test]
    fn read_level() -> binrw::BinResult<()> {
        let input = level_bytes(68);
        let mut cursor = Cursor::new(&input);
        let level = Level::read_le_args(&mut cursor, (68,))?;

        assert_eq!(level.model, ObjectRef(4));
        assert_eq!(level.reach_specs[0].distance, 16);
        assert_eq!(level.reach_specs[0].end, ObjectRef(2));
        assert!(level.reach_specs[0].pruned);
        assert_eq!(level.text_blocks[15], ObjectRef(-1));

        let travel = level.travel_info.expect("travel info");
        assert_eq!(travel[0].key.to_string_lossy(), "A");
        assert_eq!(travel[0].value.to_string_lossy(), "B");
        assert_eq!(cursor.position(), input.len() as u64);

        Ok(())
    }

    #[test]
    fn read_level_without_travel_info() -> binrw::BinResult<()> {
        let input = level_bytes(62);
        let mut cursor = Cursor::new(&input);
        let level = Level::read_le_args(&mut cursor, (62,))?;

        assert_eq!(level.travel_info, None);
        assert_eq!(cursor.position(), input.len() as u64);

        Ok(())
    }
}
