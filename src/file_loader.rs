use crate::state::State;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

/// Loads a compiled LC-3 object image into `state`. The first big-endian
/// 16-bit word read from `reader` is the origin: it becomes `pc` and the
/// address of the first program word. Every subsequent word is written to
/// memory starting at the origin and incrementing (wrapping at 2^16).
///
/// Calls `state.init()` first, so loading always starts from a clean
/// slate. EOF at any word boundary ends loading cleanly; a dangling odd
/// trailing byte is discarded. The loader never fails on malformed input -
/// a zero-word stream simply leaves the machine at its init state.
pub fn load<R: Read>(state: &mut State, mut reader: R) -> io::Result<()> {
    state.init();

    let origin = match reader.read_u16::<BigEndian>() {
        Ok(word) => word,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
        Err(e) => return Err(e),
    };

    state.pc = origin;
    let mut address = origin;

    loop {
        match reader.read_u16::<BigEndian>() {
            Ok(word) => {
                state.write_mem(address, word);
                address = address.wrapping_add(1);
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}
