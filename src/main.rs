fn main() {
    blade_rush::game::run();
}
