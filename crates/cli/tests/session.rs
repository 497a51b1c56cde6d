use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use stockroom_cli::{Console, ConsoleAlertObserver};
use stockroom_infra::FlatFileStore;
use stockroom_inventory::InventoryStore;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct TempFile(PathBuf);

impl TempFile {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("stockroom-session-{}.txt", uuid::Uuid::now_v7())))
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

#[test]
fn console_session_persists_and_alerts() {
    let tmp = TempFile::new();
    let file = FlatFileStore::new(&tmp.0);

    // First session: build up stock, trigger one alert, save.
    let store = InventoryStore::new();
    let alerts = SharedBuf::default();
    store.add_observer(Arc::new(ConsoleAlertObserver::with_writer(Box::new(alerts.clone()))));

    let script = "add P1001|Laptop|5|5\n\
                  ship P1001 10\n\
                  order P1001 6\n\
                  order P1001 5\n\
                  order P1001 100\n\
                  add P2002|Dock|pipe|1\n\
                  add P3003|Monitor|2|0\n\
                  quit\n";
    let mut out = Vec::new();
    Console::new(&store).run(script.as_bytes(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Error: insufficient stock for product Laptop"));
    assert!(out.contains("Invalid number format: pipe"));
    assert_eq!(
        alerts.text(),
        "[ALERT] Low stock for Laptop (ID: P1001) - only 4 left!\n"
    );

    file.save(&store).unwrap();

    // Second session: a fresh store sees the same items.
    let reloaded = InventoryStore::new();
    let report = file.load(&reloaded).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(reloaded.snapshot(), store.snapshot());
    assert_eq!(reloaded.get_product("P1001").unwrap().quantity(), 4);
}
