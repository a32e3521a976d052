mod cli;

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use myfs::{BLOCK_SIZE, MyFileSystem, NAME_MAX_LEN};
use myfs_fuse::BlockFile;
use vfs::StatKind;

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Format { image, blocks } => {
            let free = format(&image, blocks)?;
            println!("{}: {blocks} blocks, {free} free", image.display());
        }
        Command::Pack {
            image,
            blocks,
            source,
        } => {
            format(&image, blocks)?;
            let mut fs = mount(&image)?;
            pack(&mut fs, &source)?;
            println!(
                "{}: {} blocks free",
                image.display(),
                fs.free_blocks().map_err(io::Error::other)?
            );
            fs.unmount().map_err(io::Error::other)?;
        }
        Command::Ls { image } => {
            let mut fs = mount(&image)?;
            ls(&mut fs)?;
        }
        Command::Cat { image, name } => {
            let mut fs = mount(&image)?;
            cat(&mut fs, &name)?;
        }
    }

    Ok(())
}

fn format(image: &Path, blocks: usize) -> io::Result<u32> {
    let block_file = Arc::new(BlockFile::create(image, blocks)?);
    MyFileSystem::new(block_file)
        .format(BLOCK_SIZE)
        .map_err(io::Error::other)
}

fn mount(image: &Path) -> io::Result<MyFileSystem> {
    let mut fs = MyFileSystem::new(Arc::new(BlockFile::open(image)?));
    fs.mount().map_err(io::Error::other)?;
    Ok(fs)
}

fn pack(fs: &mut MyFileSystem, source: &Path) -> io::Result<()> {
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            log::warn!("skipping non UTF-8 name {:?}", entry.file_name());
            continue;
        };
        if name.len() > NAME_MAX_LEN {
            log::warn!("skipping {name:?}: longer than {NAME_MAX_LEN} bytes");
            continue;
        }

        let mut data = Vec::new();
        File::open(entry.path())?.read_to_end(&mut data)?;

        let fd = fs.open(&format!("/{name}")).map_err(io::Error::other)?;
        let written = fs.write(fd, &data).map_err(io::Error::other)?;
        fs.close(fd).map_err(io::Error::other)?;

        if written < data.len() {
            log::warn!("{name}: only {written} of {} bytes fit", data.len());
        }
        println!("packed {name} ({written} bytes)");
    }

    Ok(())
}

fn ls(fs: &mut MyFileSystem) -> io::Result<()> {
    let dir = fs.open_dir("/").map_err(io::Error::other)?;
    while let Some(entry) = fs.read_dir(dir).map_err(io::Error::other)? {
        let size = match fs.lookup(&format!("/{}", entry.name)) {
            Ok(Some(stat)) if stat.kind == StatKind::DIR => "-".to_owned(),
            Ok(Some(stat)) => stat.size.to_string(),
            // 指向空闲 inode，或名字无法原样写回
            Ok(None) | Err(myfs::Error::InvalidPath) => "?".to_owned(),
            Err(err) => return Err(io::Error::other(err)),
        };
        println!("{:>5} {:>10} {}", entry.inode, size, entry.name);
    }
    fs.close_dir(dir).map_err(io::Error::other)
}

fn cat(fs: &mut MyFileSystem, name: &str) -> io::Result<()> {
    let path = format!("/{name}");
    // 打开不存在的名字会创建文件，先只读地确认
    match fs.lookup(&path).map_err(io::Error::other)? {
        Some(stat) if stat.kind == StatKind::DIR => {
            return Err(io::Error::other(myfs::Error::IsADirectory));
        }
        Some(_) => {}
        None => {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{name}: no such file"),
            ));
        }
    }

    let fd = fs.open(&path).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    let mut buf = [0; BLOCK_SIZE];
    loop {
        let n = fs.read(fd, &mut buf).map_err(io::Error::other)?;
        if n == 0 {
            break;
        }
        stdout.write_all(&buf[..n])?;
    }
    fs.close(fd).map_err(io::Error::other)
}
