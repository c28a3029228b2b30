//! Chinese display labels for source categories.
//!
//! Output tables consumed by the bank are labelled in Traditional Chinese.
//! Unknown source labels pass through unchanged.

/// DECC building use (Japanese) to Chinese.
pub const DECC_BUILDING_TYPES: [(&str, &str); 23] = [
    ("その他", "其他"),
    ("その他物販", "其他產品銷售"),
    ("コンビニ", "便利商店"),
    ("スポーツ施設", "體育設施"),
    ("デパート・スーパー", "百貨公司和超市"),
    ("ホテル・旅館", "酒店和旅館"),
    ("一般小売", "一般零售店"),
    ("事務所", "辦公室"),
    ("劇場・ホール", "劇院和禮堂"),
    ("大学・専門学校", "大學和專業學校"),
    ("官公庁", "政府機關"),
    ("家電量販店", "電器量販店"),
    ("小・中学校", "小學/中學"),
    ("展示施設", "展覽設施"),
    ("幼稚園・保育園", "幼兒園/托兒所"),
    ("病院", "醫院"),
    ("研究機関", "研究機構"),
    ("福祉施設", "福利設施"),
    ("複合施設", "綜合設施"),
    ("郊外大型店舗", "郊區大型商店"),
    ("電算・情報センター", "計算機資訊中心"),
    ("飲食店", "餐廳"),
    ("高校", "高中"),
];

/// Energy Star market sector to Chinese.
pub const MARKET_SECTORS: [(&str, &str); 14] = [
    ("Banking/Financial Services", "銀行/金融服務"),
    ("Education", "教育"),
    ("Public Assembly", "公眾集會"),
    ("Food Sales & Service", "食品銷售服務"),
    ("Healthcare", "醫療保健"),
    ("Lodging/Residential", "住宿/住宅"),
    ("Mixed Use", "混合用途"),
    ("Office", "辦公室"),
    ("Public Services", "公共服務設施"),
    ("Retail", "零售"),
    ("Technology/Science", "科技/科學"),
    ("Services", "個人服務"),
    ("Utility", "公有設施"),
    ("Warehouse/Storage", "倉庫/倉儲"),
];

/// Energy Star property type to Chinese.
pub const PROPERTY_TYPES: [(&str, &str); 48] = [
    ("Bank Branch", "銀行分行"),
    ("Financial Office", "金融辦公室"),
    ("College/University", "大學/學院"),
    ("K-12 School", "K-12學校"),
    ("Pre-school/Daycare", "幼兒園/日托"),
    ("Vocational School/Adult Education", "職業學校/成人教育"),
    ("Convention Center/Meeting Hall", "會議中心/會議廳"),
    ("Recreation/Athletic Centers", "休閒/運動中心"),
    ("Entertainment", "娛樂場所"),
    ("Worship Facility", "宗教設施"),
    ("Convenience Store", "便利商店"),
    ("Bar/Nightclub", "酒吧/夜總會"),
    ("Fast Food Restaurant", "快餐店"),
    ("Restaurant", "餐廳"),
    ("Supermarket/Grocery Store", "超市/雜貨店"),
    ("Wholesale Club/Supercenter", "批發商店"),
    ("Ambulatory Surgical Center", "門診手術中心"),
    ("Hospital (General Medical & Surgical)", "醫院(一般醫療和外科)"),
    ("Other/Specialty Hospital", "其他/專科醫院"),
    ("Medical Office", "醫療辦公室"),
    ("Outpatient Rehabilitation/Physical Therapy", "門診復健/物理治療"),
    ("Urgent Care/Clinic/Other Outpatient", "急診/診所/其他門診"),
    ("Barracks", "軍營"),
    ("Hotel", "酒店"),
    ("Multifamily Housing", "多家庭住宅"),
    ("Prison/Incarceration", "監獄"),
    ("Residence Hall/Dormitory", "宿舍"),
    ("Residential Care Facility", "養老院"),
    ("Mixed Use Property", "混合用途物業"),
    ("Office", "辦公室"),
    ("Veterinary Office", "獸醫辦公室"),
    ("Courthouse", "法院"),
    ("Fire/Police Station", "消防/警察局"),
    ("Library", "圖書館"),
    ("Mailing Center/Post Office", "郵寄中心/郵局"),
    ("Transportation Terminal/Station", "交通運輸轉運站"),
    ("Automobile Dealership", "汽車經銷商"),
    ("Enclosed Mall", "封閉式購物中心"),
    ("Strip Mall", "連鎖商場"),
    ("Retail Store", "零售店"),
    ("Laboratory", "實驗室"),
    ("Dry cleaning, Shoe Repair, Locksmith, Salon, etc.", "乾洗店、鞋修理店、鎖匠、沙龍等"),
    ("Drinking Water Treatment & Distribution", "飲用水處理"),
    ("Energy/Power Station", "能源/發電站"),
    ("Self-Storage Facility", "自存倉"),
    ("Distribution Center", "配送中心"),
    ("Non-Refrigerated Warehouse", "非冷藏倉庫"),
    ("Refrigerated Warehouse", "冷藏倉庫"),
];

/// Translates `label` through `table`, returning it unchanged when absent.
pub fn translate<'a>(table: &[(&'static str, &'static str)], label: &'a str) -> &'a str {
    table
        .iter()
        .find(|(source, _)| *source == label)
        .map_or(label, |(_, target)| target)
}
