fn main() {
    duskwing::uci::run();
}
