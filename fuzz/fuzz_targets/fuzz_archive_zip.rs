#![no_main]
use std::io::Write;

use libfuzzer_sys::fuzz_target;
use zipbrute::ZipArchive;

// Open an arbitrary file as an archive and read every member with a fixed
// password.
fuzz_target!(|data: &[u8]| {
    let path = std::env::temp_dir().join(format!("zipbrute-fuzz-{}.zip", std::process::id()));
    let Ok(mut file) = std::fs::File::create(&path) else {
        return;
    };
    if file.write_all(data).is_err() {
        return;
    }
    drop(file);

    if let Ok(mut archive) = ZipArchive::open(&path) {
        for index in 0..archive.members().len().min(16) {
            let _ = archive.set_password(index, b"AB");
            if let Ok(mut reader) = archive.open_member(index) {
                let _ = reader.drain();
            }
        }
    }
    let _ = std::fs::remove_file(&path);
});
