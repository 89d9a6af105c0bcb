#![no_main]
use libfuzzer_sys::fuzz_target;
use zipbrute::parsing::{
    CentralHeaderParser, EndHeaderParser, LocalHeaderParser, Zip64EndHeaderParser,
    Zip64LocatorParser,
};

fuzz_target!(|data: &[u8]| {
    let _ = CentralHeaderParser::parse(data);
    let _ = LocalHeaderParser::parse(data);
    let _ = EndHeaderParser::parse(data);
    let _ = Zip64LocatorParser::parse(data);
    let _ = Zip64EndHeaderParser::parse(data);
    if let Ok(pos) = EndHeaderParser::find(data) {
        let _ = EndHeaderParser::parse(&data[pos..]);
    }
});
