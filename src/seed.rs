use crate::catalog::IdGenerator;
use crate::error::Result;
use crate::models::{Book, BookStatus};

/// Starter shelf written into a brand-new catalog.
const SAMPLE_BOOKS: [(&str, &str, &str, i32, BookStatus, &str); 27] = [
  ("Đắc Nhân Tâm", "Dale Carnegie", "Kỹ năng", 1936, BookStatus::Available, "assets/images/dac-nhan-tam.jpg"),
  ("Sapiens: Lược Sử Loài Người", "Yuval Noah Harari", "Lịch sử", 2011, BookStatus::Available, "assets/images/sapiens-yuval-noah-harari.jpg"),
  ("Nhà Giả Kim", "Paulo Coelho", "Văn học", 1988, BookStatus::Available, "assets/images/nha-gia-kim-paulo-coelho.jpg"),
  ("Tư Duy Nhanh Và Chậm", "Daniel Kahneman", "Khoa học", 2011, BookStatus::Available, "assets/images/tu-duy-nhanh-va-cham-daniel-kahneman.jpg"),
  ("Cha Giàu Cha Nghèo", "Robert Kiyosaki", "Kinh tế", 1997, BookStatus::Available, "assets/images/cha-giau-cha-ngheo.jpg"),
  ("Thói Quen Nguyên Tử", "James Clear", "Kỹ năng", 2018, BookStatus::Available, "assets/images/thoi-quen-nguyen-tu-james-clear.jpg"),
  ("Binh Pháp Tôn Tử", "Tôn Tử", "Lịch sử", -500, BookStatus::Available, "assets/images/binh-phap-ton-tu-sun-tzu.jpg"),
  ("Clean Code", "Robert C. Martin", "Công nghệ", 2008, BookStatus::Available, "assets/images/clean-code-robert-c-martin.jpg"),
  ("Hoàng Tử Bé", "Antoine de Saint-Exupéry", "Thiếu nhi", 1943, BookStatus::Available, "assets/images/hoang-tu-be-antoine-de-saint-exupery.jpg"),
  ("Zero to One", "Peter Thiel", "Kinh tế", 2014, BookStatus::Available, "assets/images/zero-to-one-peter-thiel.jpg"),
  ("Nghệ Thuật Bán Hàng", "Zig Ziglar", "Kỹ năng", 1982, BookStatus::Available, "assets/images/nghe-thuat-ban-hang.jpg"),
  ("Đừng Bao Giờ Đi Ăn Một Mình", "Keith Ferrazzi", "Kỹ năng", 2005, BookStatus::Available, "assets/images/dung-bao-gio-di-an-mot-minh.jpg"),
  ("Tuổi Trẻ Đáng Giá Bao Nhiêu", "Rosie Nguyễn", "Văn học", 2018, BookStatus::Available, "assets/images/tuoi-tre-dang-gia-bao-nhieu.jpg"),
  ("Càng Bình Tĩnh Càng Hạnh Phúc", "Nguyễn Anh Dũng", "Văn học", 2019, BookStatus::Unavailable, "assets/images/cang-binh-tinh-cang-hanh-phuc.jpg"),
  ("Hành Trình Về Phương Đông", "Nguyễn Phong", "Văn học", 2005, BookStatus::Available, "assets/images/hanh-trinh-ve-phuong-dong.jpg"),
  ("Lược Sử Thời Gian", "Stephen Hawking", "Khoa học", 1988, BookStatus::Available, "assets/images/luoc-su-thoi-gian.jpg"),
  ("Vũ Trụ Trong Vỏ Hạt Dẻ", "Stephen Hawking", "Khoa học", 2001, BookStatus::Available, "assets/images/vu-tru-trong-vo-hat-de.jpg"),
  ("Trí Tuệ Nhân Tạo", "Kai-Fu Lee", "Công nghệ", 2018, BookStatus::Available, "assets/images/tri-tue-nhan-tao.jpg"),
  ("The Lean Startup", "Eric Ries", "Kinh tế", 2011, BookStatus::Available, "assets/images/the-lean-startup.jpg"),
  ("Chiến Tranh Tiền Tệ", "Song Hong Bing", "Kinh tế", 2007, BookStatus::Unavailable, "assets/images/chien-tranh-tien-te.jpg"),
  ("Lịch Sử Việt Nam", "Nhiều tác giả", "Lịch sử", 2015, BookStatus::Available, "assets/images/lich-su-viet-nam.jpg"),
  ("Đại Việt Sử Ký Toàn Thư", "Ngô Sĩ Liên", "Lịch sử", 1479, BookStatus::Available, "assets/images/dai-viet-su-ky-toan-thu.jpg"),
  ("Harry Potter và Hòn Đá Phù Thủy", "J.K. Rowling", "Thiếu nhi", 1997, BookStatus::Available, "assets/images/harry-potter-va-hon-da-phu-thuy.jpg"),
  ("Dế Mèn Phiêu Lưu Ký", "Tô Hoài", "Thiếu nhi", 1941, BookStatus::Available, "assets/images/de-men-phieu-luu-ky.jpg"),
  ("Doraemon - Chú Mèo Máy Đến Từ Tương Lai", "Fujiko F. Fujio", "Thiếu nhi", 1969, BookStatus::Available, "assets/images/doraemon-chu-meo-may-den-tu-tuong-lai.jpg"),
  ("Lập Trình Python Cơ Bản", "Nguyễn Văn A", "Công nghệ", 2020, BookStatus::Available, "assets/images/lap-trinh-python-co-ban.jpg"),
  ("JavaScript: The Good Parts", "Douglas Crockford", "Công nghệ", 2008, BookStatus::Upcoming, "assets/images/javascript.jpg"),
];

pub const SAMPLE_BOOK_COUNT: usize = SAMPLE_BOOKS.len();

/// Builds the sample shelf, drawing one fresh id per book.
pub fn default_books(ids: &mut IdGenerator) -> Result<Vec<Book>> {
  SAMPLE_BOOKS
    .iter()
    .map(|(title, author, category, year, status, image)| {
      Ok(Book {
        id: ids.next_id()?,
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
        year: *year,
        status: *status,
        image: image.to_string(),
        quantity: None,
        content: None,
      })
    })
    .collect()
}
