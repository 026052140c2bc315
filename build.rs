fn main() {
    #[cfg(target_os = "windows")]
    {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "Regression Report");
        res.set("FileDescription", "Data Analysis and Report Generator");
        res.compile().expect("Failed to compile Windows resources");
    }
}
