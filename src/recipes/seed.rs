use time::OffsetDateTime;

use super::repo_types::{Category, Difficulty, Recipe, SEED_AUTHOR};

struct SeedRecipe {
    id: i64,
    name: &'static str,
    category: Category,
    difficulty: Difficulty,
    time: u32,
    servings: u32,
    description: &'static str,
    ingredients: &'static [&'static str],
    instructions: &'static [&'static str],
    image: &'static str,
    tags: &'static [&'static str],
}

const SEED: &[SeedRecipe] = &[
    SeedRecipe {
        id: 1,
        name: "Phở Bò Truyền Thống",
        category: Category::Main,
        difficulty: Difficulty::Medium,
        time: 180,
        servings: 4,
        description: "Món phở bò truyền thống với nước dùng trong vắt, thơm ngon",
        ingredients: &[
            "1kg xương bò",
            "500g thịt bò tái",
            "200g bánh phở",
            "1 củ hành tây",
            "3 tép tỏi",
            "Gừng, quế, hồi, đinh hương",
            "Hành lá, ngò gai",
            "Nước mắm, muối, đường",
        ],
        instructions: &[
            "Ninh xương bò trong 3-4 tiếng để có nước dùng trong",
            "Ướp thịt bò với gia vị trong 30 phút",
            "Chuẩn bị bánh phở và rau thơm",
            "Trụng bánh phở qua nước sôi",
            "Xếp bánh phở, thịt bò vào tô",
            "Chan nước dùng nóng và thêm rau thơm",
        ],
        image: "/vietnamese-pho-bo-soup.jpg",
        tags: &["truyền thống", "nước dùng", "thịt bò"],
    },
    SeedRecipe {
        id: 2,
        name: "Bánh Mì Thịt Nướng",
        category: Category::Main,
        difficulty: Difficulty::Easy,
        time: 45,
        servings: 2,
        description: "Bánh mì giòn với thịt nướng thơm lừng và rau củ tươi ngon",
        ingredients: &[
            "2 ổ bánh mì",
            "300g thịt heo vai",
            "Pate gan",
            "Dưa chua, cà rốt",
            "Rau thơm, dưa leo",
            "Tương ớt, mayonnaise",
            "Gia vị nướng thịt",
        ],
        instructions: &[
            "Ướp thịt với gia vị trong 30 phút",
            "Nướng thịt trên than hoa hoặc lò nướng",
            "Cắt bánh mì, phết pate và mayonnaise",
            "Xếp thịt nướng và rau củ vào bánh mì",
            "Thêm tương ớt theo khẩu vị",
        ],
        image: "/vietnamese-banh-mi-sandwich.jpg",
        tags: &["nhanh gọn", "thịt nướng", "bánh mì"],
    },
    SeedRecipe {
        id: 3,
        name: "Chè Đậu Xanh",
        category: Category::Dessert,
        difficulty: Difficulty::Easy,
        time: 60,
        servings: 6,
        description: "Chè đậu xanh mát lạnh, ngọt dịu, thích hợp cho mùa hè",
        ingredients: &[
            "200g đậu xanh",
            "100g đường phèn",
            "400ml nước cốt dừa",
            "1 muỗng cà phê muối",
            "Lá dứa",
            "Đá bào",
        ],
        instructions: &[
            "Ngâm đậu xanh 2 tiếng rồi nấu chín",
            "Nấu nước cốt dừa với đường và muối",
            "Trộn đậu xanh với nước cốt dừa",
            "Để nguội trong tủ lạnh",
            "Ăn kèm với đá bào",
        ],
        image: "/vietnamese-mung-bean-dessert.jpg",
        tags: &["tráng miệng", "mát lạnh", "đậu xanh"],
    },
    SeedRecipe {
        id: 4,
        name: "Cà Ri Gà",
        category: Category::Main,
        difficulty: Difficulty::Medium,
        time: 90,
        servings: 4,
        description: "Cà ri gà đậm đà với nước cốt dừa và gia vị thơm ngon",
        ingredients: &[
            "1 con gà ta",
            "400ml nước cốt dừa",
            "2 củ khoai tây",
            "1 củ cà rốt",
            "Sả, gừng, tỏi",
            "Cà ri bột, ớt bột",
            "Nước mắm, đường",
        ],
        instructions: &[
            "Thái gà thành miếng vừa ăn",
            "Phi thơm sả, gừng, tỏi",
            "Xào gà với cà ri bột",
            "Thêm nước cốt dừa và rau củ",
            "Nấu nhỏ lửa 45 phút",
            "Nêm nếm gia vị cho vừa khẩu vị",
        ],
        image: "/vietnamese-chicken-curry.jpg",
        tags: &["cà ri", "gà", "nước cốt dừa"],
    },
    SeedRecipe {
        id: 5,
        name: "Nước Chanh Dây",
        category: Category::Drink,
        difficulty: Difficulty::Easy,
        time: 10,
        servings: 2,
        description: "Nước chanh dây chua ngọt, giải khát tuyệt vời",
        ingredients: &[
            "4 quả chanh dây",
            "3 muỗng cà phê đường",
            "500ml nước lạnh",
            "Đá viên",
            "Lá bạc hà (tùy chọn)",
        ],
        instructions: &[
            "Lấy cùi chanh dây",
            "Trộn với đường và nước lạnh",
            "Khuấy đều cho đường tan",
            "Thêm đá viên",
            "Trang trí với lá bạc hà",
        ],
        image: "/passion-fruit-juice-drink.jpg",
        tags: &["giải khát", "chua ngọt", "chanh dây"],
    },
    SeedRecipe {
        id: 6,
        name: "Canh Chua Cá",
        category: Category::Soup,
        difficulty: Difficulty::Medium,
        time: 40,
        servings: 4,
        description: "Canh chua cá đậm đà với cà chua và dứa",
        ingredients: &[
            "500g cá basa",
            "2 quả cà chua",
            "100g dứa",
            "100g đậu bắp",
            "50g giá đỗ",
            "Me, tỏi, hành",
            "Nước mắm, đường",
            "Rau thơm",
        ],
        instructions: &[
            "Sơ chế cá, cắt miếng vừa ăn",
            "Nấu nước dùng từ xương cá",
            "Phi thơm tỏi, hành",
            "Thêm cà chua, dứa vào nấu",
            "Cho cá và rau củ vào nấu",
            "Nêm nếm chua ngọt vừa khẩu vị",
        ],
        image: "/vietnamese-sour-fish-soup.png",
        tags: &["canh chua", "cá", "cà chua"],
    },
];

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// The starter catalog written on first run, authored by [`SEED_AUTHOR`].
pub fn default_recipes(now: OffsetDateTime) -> Vec<Recipe> {
    SEED.iter()
        .map(|s| Recipe {
            id: s.id,
            name: s.name.to_string(),
            category: s.category,
            difficulty: s.difficulty,
            time: s.time,
            servings: s.servings,
            description: s.description.to_string(),
            ingredients: owned(s.ingredients),
            instructions: owned(s.instructions),
            image: s.image.to_string(),
            tags: owned(s.tags),
            author: SEED_AUTHOR.to_string(),
            created_at: now,
            updated_at: None,
        })
        .collect()
}
