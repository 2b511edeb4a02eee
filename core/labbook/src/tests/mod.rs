//! ストア・ユースケースのシナリオテスト（tempdir 上の実ファイルを使う）

mod usecase_tests;

use common::adapter::StdFileSystem;
use common::error::Error;
use common::ports::outbound::{Clock, FileMetadata, FileSystem, Log, LogRecord};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// rename だけ失敗させる FileSystem（一時ファイル書き込み後に落ちた状況の再現）
pub(crate) struct FailingRenameFs;

impl FileSystem for FailingRenameFs {
    fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        StdFileSystem.read(path)
    }
    fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
        StdFileSystem.write(path, contents)
    }
    fn rename(&self, from: &Path, _to: &Path) -> Result<(), Error> {
        Err(Error::io_msg(format!("simulated crash before renaming '{}'", from.display())))
    }
    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        StdFileSystem.create_dir_all(path)
    }
    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        StdFileSystem.metadata(path)
    }
    fn remove_file(&self, path: &Path) -> Result<(), Error> {
        StdFileSystem.remove_file(path)
    }
    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error> {
        StdFileSystem.open_append(path)
    }
}

/// 記録したログをメモリに溜める Log
#[derive(Default)]
pub(crate) struct MemoryLog {
    pub records: Mutex<Vec<LogRecord>>,
}

impl MemoryLog {
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }
}

impl Log for MemoryLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// 固定時刻の Clock
pub(crate) struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

pub(crate) fn std_fs() -> Arc<dyn FileSystem> {
    Arc::new(StdFileSystem)
}
