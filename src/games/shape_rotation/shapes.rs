/// Round-one letter outlines as path data, in a 100x100 box.
pub static CANONICAL_SHAPES: [(&str, &str); 8] = [
    ("F", "M 30 10 L 75 10 L 75 25 L 45 25 L 45 45 L 65 45 L 65 60 L 45 60 L 45 90 L 30 90 Z"),
    ("L", "M 30 10 L 45 10 L 45 75 L 75 75 L 75 90 L 30 90 Z"),
    ("J", "M 55 10 L 70 10 L 70 65 C 70 85 60 92 45 92 C 32 92 25 84 25 70 L 40 70 C 40 76 42 78 46 78 C 52 78 55 74 55 65 Z"),
    ("P", "M 30 10 L 55 10 Q 80 10 80 32 Q 80 55 55 55 L 45 55 L 45 90 L 30 90 Z"),
    ("R", "M 30 10 L 55 10 Q 80 10 80 32 Q 80 52 60 55 L 80 90 L 63 90 L 45 56 L 45 90 L 30 90 Z"),
    ("G", "M 75 25 Q 65 10 50 10 Q 20 10 20 50 Q 20 90 50 90 Q 78 90 80 55 L 52 55 L 52 68 L 64 68 Q 60 77 50 77 Q 35 77 35 50 Q 35 23 50 23 Q 60 23 64 32 Z"),
    ("K", "M 25 10 L 40 10 L 40 45 L 65 10 L 82 10 L 52 50 L 82 90 L 65 90 L 40 56 L 40 90 L 25 90 Z"),
    ("Q", "M 50 10 Q 15 10 15 48 Q 15 86 50 86 Q 60 86 67 82 L 77 92 L 86 83 L 76 73 Q 85 63 85 48 Q 85 10 50 10 Z"),
];
