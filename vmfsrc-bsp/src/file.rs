//! Low-level BSP file access: ident detection, lump directory and game lumps.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info, trace, warn};

use crate::app::{self, AppId};
use crate::buffer::{self, BspBuffer, Endianness};
use crate::error::{BspError, Result};
use crate::lump::{GameLump, Lump};
use crate::lump_file::LumpFile;
use crate::lump_type::LumpType;
use crate::lzma;
use crate::xor;

/// Packs four ASCII chars into an ident the way the engine's MAKEID macro
/// does, first char in the lowest byte.
pub const fn make_id(id: &[u8; 4]) -> u32 {
    (id[3] as u32) << 24 | (id[2] as u32) << 16 | (id[1] as u32) << 8 | id[0] as u32
}

/// The four chars of an ident, low byte first.
pub fn unmake_id(id: i32) -> String {
    String::from_utf8_lossy(&id.to_le_bytes()).into_owned()
}

/// Valve ident.
pub const BSP_ID: u32 = make_id(b"VBSP");

/// Titanfall ident.
pub const BSP_ID_TF: u32 = make_id(b"rBSP");

pub const HEADER_LUMPS: usize = 64;
pub const HEADER_LUMPS_TF: usize = 128;
pub const HEADER_SIZE: usize = 1036;
pub const MAX_LUMPFILES: usize = 128;

/// Where the 32 byte XOR key sits in a ciphered file. The deciphered map
/// always(?) stores null bytes there.
const XOR_KEY_OFFSET: usize = 384;

/// A parsed BSP container: header fields, the outer lump directory and the
/// embedded game-lump directory.
pub struct BspFile {
    file: Option<PathBuf>,
    name: String,
    order: Endianness,
    version: i32,
    map_rev: i32,
    app_id: AppId,
    lumps: Vec<Lump>,
    game_lumps: Vec<GameLump>,
}

impl BspFile {
    /// Opens a BSP file and loads its headers and lumps. For Titanfall maps
    /// this also merges the sibling `.bsp_lump` and `.ent` files.
    pub fn load(path: impl AsRef<Path>) -> Result<BspFile> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();

        debug!("Loading headers from {}", name);

        let data = fs::read(path)?;
        let mut bsp = Self::from_bytes(&name, data)?;
        bsp.file = Some(path.to_path_buf());
        for lump in &mut bsp.lumps {
            lump.set_parent_file(Some(path.to_path_buf()));
        }

        if bsp.app_id == app::TITANFALL {
            bsp.load_titanfall_lump_files();
            bsp.load_titanfall_entity_files();
        }

        Ok(bsp)
    }

    /// Parses a BSP container from an in-memory buffer. Sibling files are not
    /// scanned since there is no path to resolve them against.
    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<BspFile> {
        let (mut bb, mut app_id) = Self::create_buffer(data)?;

        trace!("Endianness: {:?}", bb.order());

        let mut version = bb.get_i32()?;

        trace!("Version: {}", version);

        if version == 0x40014 {
            // Dark Messiah maps use 14 00 04 00 as version; the real version
            // sits in the low byte.
            trace!("Found Dark Messiah header");
            app_id = app::DARK_MESSIAH;
            version &= 0xff;
        } else if version == 27 {
            trace!("Found Contagion header");
            app_id = app::CONTAGION;
        }

        // L4D2 shares version 21 with other games but leaves the first
        // descriptor field zero because of its reordered layout.
        if version == 21 && bb.i32_at(8)? == 0 {
            trace!("Found Left 4 Dead 2 header");
            app_id = app::LEFT_4_DEAD_2;
        }

        // extra int for Contagion, always 0?
        if app_id == app::CONTAGION {
            bb.get_i32()?;
        }

        let mut map_rev = 0;
        if app_id == app::TITANFALL {
            map_rev = bb.get_i32()?;
            trace!("Map revision: {}", map_rev);

            bb.get_i32()?; // always 127?
        }

        let lumps = Self::load_lumps(&mut bb, app_id, version)?;

        let mut bsp = BspFile {
            file: None,
            name: name.to_string(),
            order: bb.order(),
            version,
            map_rev,
            app_id,
            lumps,
            game_lumps: Vec::new(),
        };

        if let Err(e) = bsp.load_game_lumps() {
            error!("Couldn't load game lumps: {}", e);
        }

        if bsp.app_id != app::TITANFALL {
            bsp.map_rev = bb.get_i32()?;
            trace!("Map revision: {}", bsp.map_rev);
        }

        Ok(bsp)
    }

    /// Checks the ident, detects the byte order and deciphers the buffer if
    /// required. Returns the buffer positioned after the ident.
    fn create_buffer(mut data: Vec<u8>) -> Result<(BspBuffer, AppId)> {
        if data.len() < 4 {
            return Err(BspError::InvalidHeader);
        }

        // A surprising amount of people try to decompile zip archives.
        if matches!(
            &data[0..4],
            [0x50, 0x4B, 0x03, 0x04] | [0x50, 0x4B, 0x05, 0x06] | [0x50, 0x4B, 0x07, 0x08]
        ) {
            error!(
                "File is a zip archive. Extract any bsp file it contains and \
                 select that for decompilation."
            );
            return Err(BspError::ZipArchive);
        }

        // make sure there is enough room for reading the whole header
        if data.len() < HEADER_SIZE {
            return Err(BspError::InvalidHeader);
        }

        let ident: [u8; 4] = data[0..4].try_into().unwrap();

        if u32::from_be_bytes(ident) == BSP_ID {
            let mut bb = BspBuffer::new(data, Endianness::Big);
            bb.set_position(4);
            return Ok((bb, app::UNKNOWN));
        }

        let swapped = u32::from_le_bytes(ident);

        if swapped == BSP_ID {
            let mut bb = BspBuffer::new(data, Endianness::Little);
            bb.set_position(4);
            return Ok((bb, app::UNKNOWN));
        } else if swapped == BSP_ID_TF {
            trace!("Found Titanfall header");
            let mut bb = BspBuffer::new(data, Endianness::Little);
            bb.set_position(4);
            return Ok((bb, app::TITANFALL));
        }

        if swapped == 0x1E {
            return Err(BspError::GoldSrcFormat);
        }

        // check for XOR encryption; right now only Tactical Intervention
        // uses this, for whatever reason
        let mut key = [0u8; xor::KEY_LEN];
        key.copy_from_slice(&data[XOR_KEY_OFFSET..XOR_KEY_OFFSET + xor::KEY_LEN]);

        // try to decipher only the ident first, it's much faster
        let probe = xor::xor_word(ident, &key);

        if u32::from_le_bytes(probe) == BSP_ID {
            debug!(
                "Found XOR encryption using the key \"{}\"",
                String::from_utf8_lossy(&key)
            );

            xor::xor_buffer(&mut data, &key);

            let mut bb = BspBuffer::new(data, Endianness::Little);
            bb.set_position(4);
            return Ok((bb, app::TACTICAL_INTERVENTION));
        }

        let raw = swapped as i32;
        Err(BspError::UnknownIdent(raw, unmake_id(raw)))
    }

    fn load_lumps(bb: &mut BspBuffer, app_id: AppId, version: i32) -> Result<Vec<Lump>> {
        debug!("Loading lumps");

        let num_lumps = if app_id == app::TITANFALL {
            HEADER_LUMPS_TF
        } else {
            HEADER_LUMPS
        };

        let cap = bb.capacity() as i32;
        let mut lumps = Vec::with_capacity(num_lumps);

        for i in 0..num_lumps {
            let (vers, mut ofs, mut len);

            // L4D2 maps use a different field order
            if app_id == app::LEFT_4_DEAD_2 {
                vers = bb.get_i32()?;
                ofs = bb.get_i32()?;
                len = bb.get_i32()?;
            } else {
                ofs = bb.get_i32()?;
                len = bb.get_i32()?;
                vers = bb.get_i32()?;
            }

            // length of the uncompressed lump, 0 if not compressed
            let four_cc = bb.get_i32()?;

            let ltype = LumpType::get(i, version);

            // fix invalid offsets
            if ofs > cap {
                let ofs_old = ofs;
                ofs = cap;
                len = 0;
                warn!("Invalid lump offset {} in {:?}, assuming {}", ofs_old, ltype, ofs);
            } else if ofs < 0 {
                let ofs_old = ofs;
                ofs = 0;
                len = 0;
                warn!("Negative lump offset {} in {:?}, assuming {}", ofs_old, ltype, ofs);
            }

            // fix invalid lengths
            if ofs as i64 + len as i64 > cap as i64 {
                let len_old = len;
                len = cap - ofs;
                warn!("Invalid lump length {} in {:?}, assuming {}", len_old, ltype, len);
            } else if len < 0 {
                let len_old = len;
                len = 0;
                warn!("Negative lump length {} in {:?}, assuming {}", len_old, ltype, len);
            }

            let mut lump = Lump::new(i, ltype);
            lump.set_buffer(bb.slice(ofs as usize, len as usize)?.into_bytes());
            lump.set_offset(ofs);
            lump.set_four_cc(four_cc);
            lump.set_version(vers);
            lumps.push(lump);
        }

        Ok(lumps)
    }

    fn load_game_lumps(&mut self) -> Result<()> {
        debug!("Loading game lumps");

        let lump = self.get_lump(LumpType::GameLump);
        let lump_offset = lump.offset();
        let lump_length = lump.length();

        if lump.buffer().is_empty() {
            debug!("Game lump is empty");
            return Ok(());
        }

        let mut r = BspBuffer::new(lump.buffer().to_vec(), self.order);

        // Vindictus uses version 20 with widened descriptor fields; probe
        // both layouts to tell them apart.
        if self.version == 20
            && self.order == Endianness::Little
            && game_lump_headers_invalid(&mut r, false)
            && !game_lump_headers_invalid(&mut r, true)
        {
            trace!("Found Vindictus game lump header");
            self.app_id = app::VINDICTUS;
        }

        let headers = read_game_lump_headers(&mut r, self.app_id)?;

        let mut game_lumps = Vec::with_capacity(headers.len());

        for (i, h) in headers.iter().enumerate() {
            let mut ofs = h.ofs;
            let mut len = h.len;

            if h.flags & 1 != 0 {
                // the game lump is compressed and `len` holds the
                // uncompressed size, so the next entry's offset determines
                // the compressed size
                let mut next_ofs = headers.get(i + 1).map(|n| n.ofs).unwrap_or(0);
                if next_ofs == 0 {
                    // no next entry, assume end of game lump
                    next_ofs = lump_offset + lump_length;
                }
                len = next_ofs - ofs;
            }

            // Offsets are relative to the beginning of the BSP file, not to
            // the game lump. Not always though: the console version of
            // Portal 2 stores them pre-rebased, which this conditional can't
            // tell apart when the first entry starts at the lump itself.
            if ofs as i64 - lump_offset as i64 > 0 {
                ofs -= lump_offset;
            } else if ofs == lump_offset {
                warn!(
                    "Ambiguous game lump offset {} in {}, leaving absolute",
                    ofs,
                    unmake_id(h.four_cc)
                );
            }

            let gl_name = {
                let n = unmake_id(h.four_cc);
                if n.trim_matches(|c: char| c.is_whitespace() || c == '\0').is_empty() {
                    "<dummy>".to_string()
                } else {
                    n
                }
            };

            // fix invalid offsets
            if ofs > lump_length {
                let ofs_old = ofs;
                ofs = lump_length;
                len = 0;
                warn!("Invalid game lump offset {} in {}, assuming {}", ofs_old, gl_name, ofs);
            } else if ofs < 0 {
                let ofs_old = ofs;
                ofs = 0;
                len = 0;
                warn!("Negative game lump offset {} in {}, assuming {}", ofs_old, gl_name, ofs);
            }

            // fix invalid lengths
            if ofs as i64 + len as i64 > lump_length as i64 {
                let len_old = len;
                len = lump_length - ofs;
                warn!("Invalid game lump length {} in {}, assuming {}", len_old, gl_name, len);
            } else if len < 0 {
                let len_old = len;
                len = 0;
                warn!("Negative game lump length {} in {}, assuming {}", len_old, gl_name, len);
            }

            let mut gl = GameLump::new(h.four_cc);
            gl.set_buffer(r.slice(ofs as usize, len as usize)?.into_bytes());
            gl.set_offset(ofs);
            gl.set_flags(h.flags);
            gl.set_version(h.version);
            game_lumps.push(gl);
        }

        debug!("Game lumps: {}", game_lumps.len());
        self.game_lumps = game_lumps;

        Ok(())
    }

    /// Scans for `<name>_l_<i>.lmp` siblings and overrides internal lumps
    /// with their contents, stopping at the first missing index.
    pub fn load_lump_files(&mut self) {
        debug!("Loading lump files");

        let Some(file) = self.file.clone() else {
            return;
        };

        for i in 0..MAX_LUMPFILES {
            let lump_file = file.with_file_name(format!("{}_l_{}.lmp", self.name, i));

            if !lump_file.exists() {
                break;
            }

            match LumpFile::load(&lump_file, self.order, self.version) {
                Ok(lf) => {
                    let index = lf.lump.index();
                    if index >= self.lumps.len() {
                        warn!("Lump file {} has invalid index {}", lump_file.display(), index);
                        continue;
                    }

                    self.lumps[index] = lf.lump;

                    if self.lumps[index].lump_type() == LumpType::GameLump {
                        // reload game lumps
                        self.game_lumps.clear();
                        if let Err(e) = self.load_game_lumps() {
                            error!("Couldn't load game lumps: {}", e);
                        }
                    }
                }
                Err(e) => {
                    warn!("Unable to load lump file {}: {}", lump_file.display(), e);
                }
            }
        }
    }

    fn load_titanfall_lump_files(&mut self) {
        debug!("Loading Titanfall lump files");

        let Some(file) = self.file.clone() else {
            return;
        };

        for i in 0..HEADER_LUMPS_TF {
            let lump_file = file.with_file_name(format!("{}.bsp.{:04x}.bsp_lump", self.name, i));

            if !lump_file.exists() {
                continue;
            }

            match fs::read(&lump_file) {
                Ok(data) => {
                    self.lumps[i].set_buffer(data);
                    self.lumps[i].set_parent_file(Some(lump_file));
                }
                Err(e) => {
                    warn!("Unable to load lump file {}: {}", lump_file.display(), e);
                }
            }
        }
    }

    /// Titanfall maps spread entities over multiple .ent files. For
    /// compatibility they are concatenated into one large entity lump.
    fn load_titanfall_entity_files(&mut self) {
        debug!("Loading Titanfall entity files");

        let Some(file) = self.file.clone() else {
            return;
        };

        let ent_index = LumpType::Entities.index();

        let mut inner = self.lumps[ent_index].buffer().to_vec();
        if inner.last() == Some(&0) {
            inner.pop();
        }

        let mut parts: Vec<Vec<u8>> = vec![inner];
        for kind in ["env", "fx", "script", "snd", "spawn"] {
            parts.push(self.load_titanfall_entity_file(&file, kind));
        }
        parts.push(vec![0]); // terminator

        let slices: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
        self.lumps[ent_index].set_buffer(buffer::concat(&slices));
    }

    fn load_titanfall_entity_file(&self, file: &Path, kind: &str) -> Vec<u8> {
        let ent_file = file.with_file_name(format!("{}_{}.ent", self.name, kind));

        match fs::read(&ent_file) {
            // strip the "ENTITIESxx\n" preamble and the trailing NUL
            Ok(data) if data.len() > 12 => data[11..data.len() - 1].to_vec(),
            Ok(_) => Vec::new(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Unable to load entity file {}: {}", ent_file.display(), e);
                Vec::new()
            }
        }
    }

    /// Serializes the container: game-lump directory rebuild, greedy offset
    /// reassignment, then header, descriptor table and payloads.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>> {
        self.save_game_lumps()?;

        let size = self.fix_lump_offsets();
        let mut bb = BspBuffer::zeroed(size as usize, self.order);

        bb.put_u32(BSP_ID)?;
        bb.put_i32(self.version)?;

        self.save_lumps(&mut bb)?;

        bb.put_i32(self.map_rev)?;

        Ok(bb.into_bytes())
    }

    /// Writes the container to a file. Returns the file size.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();

        debug!("Saving headers to {}", path.display());

        let bytes = self.save_to_bytes()?;
        fs::write(path, &bytes)?;
        self.file = Some(path.to_path_buf());

        Ok(bytes.len() as u64)
    }

    /// Recalculates all lump offsets, retaining list order, so the written
    /// file has no gaps. Returns the end offset, which equals the file size.
    fn fix_lump_offsets(&mut self) -> i32 {
        // always start behind the header or terrible things will happen
        let mut offset = HEADER_SIZE as i32;

        for lump in &mut self.lumps {
            if lump.length() == 0 {
                lump.set_offset(0);
            } else {
                lump.set_offset(offset);
                offset += lump.length();
            }
        }

        offset
    }

    fn save_lumps(&mut self, bb: &mut BspBuffer) -> Result<()> {
        debug!("Saving lumps");

        for i in 0..self.lumps.len() {
            let (ofs, len, vers, four_cc) = {
                let l = &self.lumps[i];
                (l.offset(), l.length(), l.version(), l.four_cc())
            };

            if self.app_id == app::LEFT_4_DEAD_2 {
                bb.put_i32(vers)?;
                bb.put_i32(ofs)?;
                bb.put_i32(len)?;
            } else {
                bb.put_i32(ofs)?;
                bb.put_i32(len)?;
                bb.put_i32(vers)?;
            }

            bb.put_i32(four_cc)?;

            if len == 0 {
                continue;
            }

            // convert relative game lump offsets to absolute
            if self.lumps[i].lump_type() == LumpType::GameLump {
                fix_game_lump_offsets(&mut self.lumps[i], self.app_id, self.order)?;
            }

            bb.bytes_to(ofs as usize, self.lumps[i].buffer())?;
        }

        Ok(())
    }

    fn save_game_lumps(&mut self) -> Result<()> {
        let game_lump_len = self.get_lump(LumpType::GameLump).length();
        if self.game_lumps.is_empty() && game_lump_len == 0 {
            return Ok(());
        }

        debug!("Saving game lumps");

        let desc_size = if self.app_id == app::VINDICTUS { 20 } else { 16 };

        // lump count + directory
        let header_size = 4 + desc_size * self.game_lumps.len();
        let data_size: usize = self.game_lumps.iter().map(|gl| gl.length() as usize).sum();

        let mut gb = BspBuffer::zeroed(header_size + data_size, self.order);
        gb.put_i32(self.game_lumps.len() as i32)?;

        // use relative offsets, they're converted to absolute on save
        let mut offset = header_size as i32;

        for gl in &mut self.game_lumps {
            gl.set_offset(offset);
            offset += gl.length();

            gb.put_i32(gl.four_cc())?;
            if self.app_id == app::VINDICTUS {
                gb.put_i32(gl.flags())?;
                gb.put_i32(gl.version())?;
            } else {
                gb.put_u16(gl.flags() as u16)?;
                gb.put_u16(gl.version() as u16)?;
            }
            gb.put_i32(gl.offset())?;
            gb.put_i32(gl.length())?;

            gb.bytes_to(gl.offset() as usize, gl.buffer())?;
        }

        self.lumps[LumpType::GameLump.index()].set_buffer(gb.into_bytes());

        Ok(())
    }

    /// Compresses all lumps except the game lump directory and the pakfile.
    pub fn compress(&mut self) -> Result<()> {
        info!("Compressing lumps");

        for l in &mut self.lumps {
            // the game lump is handled through its own directory; the
            // pakfile is already a zip
            if matches!(l.lump_type(), LumpType::GameLump | LumpType::PakFile) {
                continue;
            }

            // skip payloads the envelope can only grow
            if l.length() <= lzma::HEADER_SIZE as i32 {
                continue;
            }

            l.compress()?;
        }

        for gl in &mut self.game_lumps {
            if gl.length() <= lzma::HEADER_SIZE as i32 {
                continue;
            }

            gl.compress()?;
        }

        // trailing dummy entry so the last compressed size stays derivable
        self.game_lumps.push(GameLump::default());

        Ok(())
    }

    /// Uncompresses all compressed lumps.
    pub fn uncompress(&mut self) -> Result<()> {
        if self.has_compressed_lumps() {
            info!("Uncompressing lumps");
        }

        for l in &mut self.lumps {
            l.uncompress()?;
        }

        for gl in &mut self.game_lumps {
            gl.uncompress()?;
        }

        Ok(())
    }

    /// True if at least one lump or game lump is compressed.
    pub fn has_compressed_lumps(&self) -> bool {
        self.lumps.iter().any(Lump::is_compressed)
            || self.game_lumps.iter().any(GameLump::is_compressed)
    }

    /// Lump type availability check against the BSP version.
    pub fn can_read_lump(&self, ltype: LumpType) -> bool {
        ltype.min_version() == -1 || ltype.min_version() <= self.version
    }

    pub fn lumps(&self) -> &[Lump] {
        &self.lumps
    }

    pub fn get_lump(&self, ltype: LumpType) -> &Lump {
        &self.lumps[ltype.index()]
    }

    pub fn game_lumps(&self) -> &[GameLump] {
        &self.game_lumps
    }

    /// The game lump with the matching four-character code, if any.
    pub fn get_game_lump(&self, name: &str) -> Option<&GameLump> {
        self.game_lumps
            .iter()
            .find(|gl| gl.name().eq_ignore_ascii_case(name))
    }

    /// The path the next new lump file would get, if any index is free.
    pub fn next_lump_file(&self) -> Option<PathBuf> {
        let file = self.file.as_ref()?;

        (0..MAX_LUMPFILES)
            .map(|i| file.with_file_name(format!("{}_l_{}.lmp", self.name, i)))
            .find(|p| !p.exists())
    }

    /// The file name without the .bsp extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Changes the name used for sibling file resolution. Doesn't rename the
    /// actual file.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// The map revision, usually equal to the "mapversion" keyvalue of the
    /// worldspawn entity.
    pub fn revision(&self) -> i32 {
        self.map_rev
    }

    pub fn set_revision(&mut self, map_rev: i32) {
        self.map_rev = map_rev;
    }

    pub fn byte_order(&self) -> Endianness {
        self.order
    }

    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    pub fn set_app_id(&mut self, app_id: AppId) {
        self.app_id = app_id;
    }
}

struct RawGameLumpHeader {
    four_cc: i32,
    flags: i32,
    version: i32,
    ofs: i32,
    len: i32,
}

fn read_game_lump_headers(r: &mut BspBuffer, app_id: AppId) -> Result<Vec<RawGameLumpHeader>> {
    let count = r.get_i32()?;
    if count < 0 {
        return Err(BspError::MalformedLump("negative game lump count"));
    }

    let mut headers = Vec::with_capacity(count as usize);

    for _ in 0..count {
        if app_id == app::DARK_MESSIAH {
            r.get_i32()?; // unknown
        }

        let four_cc = r.get_i32()?;

        // Vindictus uses full integers rather than unsigned shorts
        let (flags, version) = if app_id == app::VINDICTUS {
            (r.get_i32()?, r.get_i32()?)
        } else {
            (r.get_u16()? as i32, r.get_u16()? as i32)
        };

        let ofs = r.get_i32()?;
        let len = r.get_i32()?;

        headers.push(RawGameLumpHeader {
            four_cc,
            flags,
            version,
            ofs,
            len,
        });
    }

    Ok(headers)
}

/// Probes the game-lump directory with one of the two descriptor layouts.
/// Returns true when any four-character code comes out non-alphanumeric,
/// which indicates the layout doesn't match.
fn game_lump_headers_invalid(r: &mut BspBuffer, vindictus: bool) -> bool {
    r.set_position(0);

    let probe = (|| -> Result<bool> {
        let count = r.get_i32()?;
        if count < 0 {
            return Ok(true);
        }

        for _ in 0..count {
            let four_cc = r.get_i32()?;

            if !four_cc
                .to_le_bytes()
                .iter()
                .all(|b| b.is_ascii_alphanumeric())
            {
                return Ok(true);
            }

            r.skip(if vindictus { 16 } else { 12 })?;
        }

        Ok(false)
    })();

    r.set_position(0);

    // running off the end means the layout was wrong, too
    probe.unwrap_or(true)
}

fn fix_game_lump_offsets(lump: &mut Lump, app_id: AppId, order: Endianness) -> Result<()> {
    let lump_offset = lump.offset();
    let mut gb = BspBuffer::new(lump.buffer().to_vec(), order);

    let count = gb.i32_at(0)?;

    for i in 0..count as usize {
        let field = if app_id == app::VINDICTUS {
            20 * i + 16
        } else {
            16 * i + 12
        };

        let ofs = gb.i32_at(field)?;
        gb.i32_to(field, ofs + lump_offset)?;
    }

    lump.set_buffer(gb.into_bytes());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_packing() {
        assert_eq!(BSP_ID, u32::from_le_bytes(*b"VBSP"));
        assert_eq!(BSP_ID_TF, u32::from_le_bytes(*b"rBSP"));
        assert_eq!(unmake_id(BSP_ID as i32), "VBSP");
    }

    #[test]
    fn short_buffer_is_invalid() {
        assert!(matches!(
            BspFile::from_bytes("short", vec![0x56, 0x42, 0x53]),
            Err(BspError::InvalidHeader)
        ));
    }

    #[test]
    fn zip_archives_are_rejected() {
        let mut data = vec![0x50, 0x4B, 0x03, 0x04];
        data.resize(HEADER_SIZE, 0);
        assert!(matches!(
            BspFile::from_bytes("archive", data),
            Err(BspError::ZipArchive)
        ));
    }

    #[test]
    fn goldsrc_is_rejected() {
        let mut data = vec![0x1E, 0x00, 0x00, 0x00];
        data.resize(HEADER_SIZE, 0);
        assert!(matches!(
            BspFile::from_bytes("goldsrc", data),
            Err(BspError::GoldSrcFormat)
        ));
    }

    #[test]
    fn unknown_idents_are_rejected() {
        let mut data = b"MOOO".to_vec();
        data.resize(HEADER_SIZE, 0);
        match BspFile::from_bytes("moo", data) {
            Err(BspError::UnknownIdent(_, name)) => assert_eq!(name, "MOOO"),
            other => panic!("expected UnknownIdent, got {:?}", other.map(|_| ())),
        }
    }
}
