//! Built-in Indonesian meanings for common words, used once the provider
//! has failed every attempt.

const DICTIONARY: &[(&str, &[&str])] = &[
    // verbs
    ("be", &["adalah", "menjadi", "berada"]),
    ("have", &["mempunyai", "memiliki", "punya"]),
    ("do", &["melakukan", "mengerjakan", "berbuat"]),
    ("say", &["berkata", "mengatakan", "mengucapkan"]),
    ("get", &["mendapat", "memperoleh", "mengambil"]),
    ("make", &["membuat", "menciptakan", "menjadikan"]),
    ("go", &["pergi", "berjalan", "berangkat"]),
    ("know", &["tahu", "mengetahui", "kenal"]),
    ("take", &["mengambil", "membawa", "menerima"]),
    ("see", &["melihat", "memandang", "menonton"]),
    ("come", &["datang", "tiba", "hadir"]),
    ("think", &["berpikir", "mengira", "menganggap"]),
    ("look", &["melihat", "menatap", "tampak"]),
    ("want", &["ingin", "mau", "menginginkan"]),
    ("give", &["memberi", "memberikan", "menyerahkan"]),
    ("use", &["menggunakan", "memakai"]),
    ("find", &["menemukan", "mencari", "mendapati"]),
    ("tell", &["menceritakan", "memberitahu", "mengabarkan"]),
    ("ask", &["bertanya", "meminta", "menanyakan"]),
    ("work", &["bekerja", "kerja", "pekerjaan"]),
    ("feel", &["merasa", "merasakan", "perasaan"]),
    ("try", &["mencoba", "berusaha", "coba"]),
    ("leave", &["meninggalkan", "pergi", "keluar"]),
    ("call", &["memanggil", "menelepon", "menyebut"]),
    // nouns
    ("time", &["waktu", "masa", "kali"]),
    ("person", &["orang", "pribadi", "individu"]),
    ("year", &["tahun"]),
    ("way", &["cara", "jalan", "metode"]),
    ("day", &["hari", "siang"]),
    ("thing", &["hal", "benda", "sesuatu"]),
    ("man", &["pria", "laki-laki", "orang"]),
    ("world", &["dunia", "bumi"]),
    ("life", &["kehidupan", "hidup", "nyawa"]),
    ("hand", &["tangan"]),
    ("part", &["bagian", "sebagian", "komponen"]),
    ("child", &["anak", "bocah"]),
    ("eye", &["mata", "pandangan"]),
    ("woman", &["wanita", "perempuan"]),
    ("place", &["tempat", "lokasi", "wilayah"]),
    ("week", &["minggu", "pekan"]),
    ("home", &["rumah", "tempat tinggal", "kampung halaman"]),
    ("water", &["air", "cairan"]),
    ("room", &["ruang", "kamar"]),
    ("mother", &["ibu", "mama"]),
    ("money", &["uang", "duit"]),
    ("story", &["cerita", "kisah", "dongeng"]),
    ("month", &["bulan"]),
    ("book", &["buku", "kitab"]),
    ("word", &["kata", "perkataan", "ucapan"]),
    ("business", &["bisnis", "usaha", "perdagangan"]),
    ("issue", &["masalah", "isu", "terbitan"]),
    ("head", &["kepala", "ketua", "pimpinan"]),
    ("house", &["rumah", "gedung"]),
    ("friend", &["teman", "sahabat", "kawan"]),
    ("father", &["ayah", "bapak"]),
    ("hour", &["jam"]),
    ("game", &["permainan", "pertandingan"]),
    ("law", &["hukum", "undang-undang", "aturan"]),
    ("car", &["mobil"]),
    ("city", &["kota"]),
    ("name", &["nama", "sebutan"]),
    ("team", &["tim", "kelompok", "regu"]),
    ("idea", &["ide", "gagasan", "pikiran"]),
    ("body", &["tubuh", "badan"]),
    ("parent", &["orang tua", "induk"]),
    ("face", &["wajah", "muka"]),
    ("door", &["pintu"]),
    ("history", &["sejarah", "riwayat"]),
    ("teacher", &["guru", "pengajar"]),
    ("education", &["pendidikan", "pengajaran"]),
    // adjectives
    ("good", &["baik", "bagus"]),
    ("new", &["baru"]),
    ("first", &["pertama", "awal"]),
    ("long", &["panjang", "lama"]),
    ("little", &["kecil", "sedikit"]),
    ("old", &["tua", "lama"]),
    ("big", &["besar"]),
    ("high", &["tinggi"]),
    ("different", &["berbeda", "beda"]),
    ("small", &["kecil"]),
    ("young", &["muda"]),
    ("important", &["penting", "utama"]),
    ("bad", &["buruk", "jelek", "jahat"]),
    ("same", &["sama", "serupa"]),
    ("able", &["mampu", "bisa", "sanggup"]),
];

/// Built-in meanings for `word`, matched case-insensitively.
pub fn lookup(word: &str) -> Option<Vec<String>> {
    let word = word.trim().to_lowercase();
    DICTIONARY
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, meanings)| meanings.iter().map(|m| m.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_word() {
        assert_eq!(lookup(" Water ").unwrap(), vec!["air", "cairan"]);
    }

    #[test]
    fn unknown_word() {
        assert!(lookup("serendipity").is_none());
    }

    #[test]
    fn entries_are_unique_and_lowercase() {
        let mut words: Vec<&str> = DICTIONARY.iter().map(|(w, _)| *w).collect();
        assert!(words.iter().all(|w| *w == w.to_lowercase()));
        words.sort_unstable();
        let before = words.len();
        words.dedup();
        assert_eq!(words.len(), before);
    }
}
