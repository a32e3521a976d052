mod common;

use myfs::Error;

use common::{list_root, mounted};

#[test]
fn link_then_iterate() {
    let (_disk, mut fs) = mounted(20);
    let dir = fs.open_dir("/").unwrap();
    fs.link(dir, "b.txt", 5).unwrap();
    fs.close_dir(dir).unwrap();

    let entries = list_root(&mut fs);
    assert_eq!(
        entries.iter().filter(|(name, _)| name == "b.txt").count(),
        1
    );
    assert_eq!(entries, [(String::from("b.txt"), 5)]);
}

#[test]
fn unlink_then_iterate() {
    let (_disk, mut fs) = mounted(20);
    let dir = fs.open_dir("/").unwrap();
    fs.link(dir, "a.txt", 4).unwrap();
    fs.link(dir, "b.txt", 5).unwrap();
    fs.link(dir, "c.txt", 6).unwrap();
    fs.unlink(dir, "b.txt").unwrap();
    assert_eq!(fs.unlink(dir, "b.txt"), Err(Error::NotFound));
    fs.close_dir(dir).unwrap();

    assert_eq!(
        list_root(&mut fs),
        [(String::from("a.txt"), 4), (String::from("c.txt"), 6)]
    );
}

#[test]
fn duplicate_link_leaves_directory_unchanged() {
    let (_disk, mut fs) = mounted(20);
    let dir = fs.open_dir("/").unwrap();
    fs.link(dir, "a", 2).unwrap();
    let before = fs.stat(dir).unwrap();

    assert_eq!(fs.link(dir, "a", 3), Err(Error::AlreadyExists));
    fs.close_dir(dir).unwrap();

    assert_eq!(list_root(&mut fs), [(String::from("a"), 2)]);
    let dir = fs.open_dir("/").unwrap();
    assert_eq!(fs.stat(dir).unwrap(), before);
}

#[test]
fn link_argument_checks() {
    let (_disk, mut fs) = mounted(20);
    let dir = fs.open_dir("/").unwrap();

    assert_eq!(fs.link(dir, "", 2), Err(Error::InvalidPath));
    assert_eq!(fs.link(dir, "abcdefghijklmno", 2), Err(Error::InvalidPath));
    assert_eq!(fs.link(dir, "a/b", 2), Err(Error::InvalidPath));
    assert_eq!(fs.link(dir, "a", 0), Err(Error::InvalidInode));
    assert_eq!(fs.link(dir, "a", 17), Err(Error::InvalidInode));
    assert_eq!(fs.unlink(dir, ""), Err(Error::InvalidPath));
    assert!(list_root(&mut fs).is_empty());
}

#[test]
fn link_gives_a_second_name() {
    let (_disk, mut fs) = mounted(20);
    let fd = fs.open("/orig").unwrap();
    fs.write(fd, b"shared").unwrap();
    let inode = fs.stat(fd).unwrap().inode as u32;
    fs.close(fd).unwrap();

    let dir = fs.open_dir("/").unwrap();
    fs.link(dir, "alias", inode).unwrap();
    fs.unlink(dir, "orig").unwrap();
    fs.close_dir(dir).unwrap();

    let fd = fs.open("/alias").unwrap();
    let mut buf = [0; 16];
    assert_eq!(fs.read(fd, &mut buf), Ok(6));
    assert_eq!(&buf[..6], b"shared");
}

#[test]
fn linked_free_inode_becomes_file_on_open() {
    let (_disk, mut fs) = mounted(20);
    let dir = fs.open_dir("/").unwrap();
    fs.link(dir, "later", 9).unwrap();
    fs.close_dir(dir).unwrap();

    let fd = fs.open("/later").unwrap();
    assert_eq!(fs.stat(fd).unwrap().inode, 9);
    fs.write(fd, b"x").unwrap();
    fs.close(fd).unwrap();

    // inode 9 已被占用，新文件不会分到它
    for i in 0..14 {
        let fd = fs.open(&format!("/n{i}")).unwrap();
        assert_ne!(fs.stat(fd).unwrap().inode, 9);
        fs.close(fd).unwrap();
    }
    assert_eq!(fs.open("/full"), Err(Error::NoInode));
}

#[test]
fn directory_grows_a_second_block() {
    let (_disk, mut fs) = mounted(40);
    let free = fs.free_blocks().unwrap();
    let dir = fs.open_dir("/").unwrap();

    for i in 0..33 {
        fs.link(dir, &format!("e{i:02}"), 2).unwrap();
    }
    assert_eq!(fs.free_blocks(), Ok(free - 1));
    assert_eq!(fs.stat(dir).unwrap().size, 33 * 16);
    assert_eq!(fs.stat(dir).unwrap().blocks, 2);

    let mut names = Vec::new();
    while let Some(entry) = fs.read_dir(dir).unwrap() {
        names.push(entry.name);
    }
    assert_eq!(names.len(), 33);
    assert_eq!(names.first().map(String::as_str), Some("e00"));
    assert_eq!(names.last().map(String::as_str), Some("e32"));
    // 读尽后保持读尽
    assert_eq!(fs.read_dir(dir), Ok(None));
}

#[test]
fn holes_are_skipped_and_reused() {
    let (_disk, mut fs) = mounted(20);
    let dir = fs.open_dir("/").unwrap();
    for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
        fs.link(dir, name, i as u32 + 2).unwrap();
    }
    fs.unlink(dir, "a").unwrap();
    fs.unlink(dir, "c").unwrap();
    assert_eq!(fs.stat(dir).unwrap().size, 4 * 16);

    assert_eq!(
        list_root(&mut fs),
        [(String::from("b"), 3), (String::from("d"), 5)]
    );

    fs.link(dir, "e", 6).unwrap();
    assert_eq!(
        list_root(&mut fs),
        [(String::from("e"), 6), (String::from("b"), 3), (String::from("d"), 5)]
    );
    assert_eq!(fs.stat(dir).unwrap().size as usize, 4 * 16);
}

#[test]
fn open_dir_cursor_is_per_descriptor() {
    let (_disk, mut fs) = mounted(20);
    let first = fs.open_dir("/").unwrap();
    fs.link(first, "a", 2).unwrap();
    fs.link(first, "b", 3).unwrap();

    let second = fs.open_dir("/").unwrap();
    assert_eq!(fs.read_dir(first).unwrap().map(|e| e.name), Some("a".into()));
    assert_eq!(fs.read_dir(second).unwrap().map(|e| e.name), Some("a".into()));
    assert_eq!(fs.read_dir(first).unwrap().map(|e| e.name), Some("b".into()));
    assert_eq!(fs.read_dir(first), Ok(None));
}

#[test]
fn lookup_leaves_image_untouched() {
    let (disk, mut fs) = mounted(20);
    let fd = fs.open("/real").unwrap();
    fs.write(fd, b"abc").unwrap();
    fs.close(fd).unwrap();

    let dir = fs.open_dir("/").unwrap();
    fs.link(dir, "ghost", 3).unwrap();
    fs.link(dir, "root", 1).unwrap();
    fs.close_dir(dir).unwrap();

    let before = disk.snapshot();
    assert_eq!(fs.lookup("/ghost"), Ok(None));
    assert_eq!(fs.lookup("/missing"), Ok(None));
    assert_eq!(fs.lookup("/real").unwrap().map(|stat| stat.size), Some(3));
    assert_eq!(
        fs.lookup("/root").unwrap().map(|stat| stat.kind),
        Some(vfs::StatKind::DIR)
    );
    assert_eq!(fs.lookup("/"), Err(Error::InvalidPath));
    assert_eq!(disk.snapshot(), before);

    // ghost 指向的 inode 仍是空闲的
    let fd = fs.open("/next").unwrap();
    assert_eq!(fs.stat(fd).unwrap().inode, 3);
}
