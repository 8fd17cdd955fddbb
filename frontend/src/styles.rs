pub const CONTAINER: &str = "min-h-screen w-full bg-white";

// Wheel page
pub const WHEEL_PAGE: &str = "flex flex-col items-center gap-6 px-4 py-8 max-w-xl mx-auto";
pub const WHEEL_TITLE: &str = "text-[30px] font-semibold text-black text-center";
pub const WHEEL_HEADER: &str = "flex flex-col items-center gap-2";
pub const WHEEL_RATE: &str = "text-xs font-medium text-gray-500";
pub const WHEEL_STAGE: &str = "relative flex items-center justify-center";
pub const WHEEL_LOADING: &str = "absolute inset-0 flex items-center justify-center text-sm font-medium text-gray-500 bg-white/70 rounded-full";
pub const COIN_PILL: &str = "inline-flex items-center gap-2 px-4 py-1 rounded-full bg-white shadow-sm";
pub const SPIN_BUTTON: &str = "inline-flex items-center justify-center min-w-[220px] px-8 py-3 rounded-full text-lg font-semibold text-white bg-[#FF0054] hover:bg-[#e0004a] shadow-lg transition-all duration-300 transform hover:scale-105";

// Outcome modal
pub const MODAL_BACKDROP: &str = "fixed inset-0 z-50 flex items-center justify-center bg-black/50 backdrop-blur-sm px-4";
pub const MODAL_CARD: &str = "relative w-full max-w-sm rounded-2xl bg-white p-6 shadow-xl";
pub const MODAL_BUTTON_PRIMARY: &str = "w-full py-3 px-4 rounded-full text-base font-semibold text-white bg-[#FF0054] hover:bg-[#e0004a] transition-colors duration-200";
pub const MODAL_BUTTON_SECONDARY: &str = "w-full py-3 px-4 rounded-full text-base font-semibold text-[#FF0054] border border-[#FF0054] bg-white hover:bg-pink-50 transition-colors duration-200";
pub const MODAL_BUTTON_DANGER: &str = "w-full py-3 px-4 rounded-full text-base font-semibold text-white bg-red-600 hover:bg-red-700 transition-colors duration-200";
