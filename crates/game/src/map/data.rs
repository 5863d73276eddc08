use rkyv::{Archive, Deserialize, Serialize, rancor};

use super::MapError;

/// One grid cell. `event_id` marks gameplay markers (spawn pads, flag and
/// base pads); `object_id` is a decoration reference for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct TileData {
    pub id: u16,
    pub object_id: u16,
    pub event_id: u16,
    pub passable: bool,
    pub height: u16,
}

impl TileData {
    pub fn floor(id: u16) -> Self {
        Self {
            id,
            object_id: 0,
            event_id: 0,
            passable: true,
            height: 0,
        }
    }

    pub fn wall(id: u16, height: u16) -> Self {
        Self {
            id,
            object_id: 0,
            event_id: 0,
            passable: false,
            height,
        }
    }
}

/// The map payload exactly as the server serves it; the cached map file on
/// disk holds these bytes verbatim, so content hashes computed locally match
/// the server's authoritative hash.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct MapData {
    pub title: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub game_modes: Vec<u8>,
    pub tiles: Vec<TileData>,
}

impl MapData {
    pub fn encode(&self) -> Result<Vec<u8>, MapError> {
        rkyv::to_bytes::<rancor::Error>(self)
            .map(|bytes| bytes.to_vec())
            .map_err(MapError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MapError> {
        rkyv::from_bytes::<Self, rancor::Error>(bytes).map_err(MapError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_round_trip() {
        let data = MapData {
            title: String::from("Crossfire"),
            filename: String::from("crossfire.map"),
            width: 2,
            height: 2,
            game_modes: vec![0, 1],
            tiles: vec![
                TileData::floor(1),
                TileData::wall(7, 2),
                TileData::floor(1),
                TileData::floor(3),
            ],
        };

        let bytes = data.encode().unwrap();
        let decoded = MapData::decode(&bytes).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.tiles, data.tiles);
        assert_eq!(decoded.filename, "crossfire.map");
    }
}
